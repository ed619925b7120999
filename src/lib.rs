// spamfilter: hashing-trick spam classification
//
// This is the library root. `features` is the encoding core shared by the
// offline corpus builder (`corpus`) and the online email classifier
// (`inference`).

pub mod config;
pub mod corpus;
pub mod features;
pub mod inference;
pub mod output;
