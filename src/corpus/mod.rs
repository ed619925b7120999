// Training corpus builder: labeled SMS messages to gzip CSV feature rows.
//
// Rows are encoded with the same FeatureEncoder the email classifier uses,
// then split into train/validation files for an external training job.

pub mod builder;
pub mod dataset;
pub mod download;
pub mod split;
pub mod writer;
