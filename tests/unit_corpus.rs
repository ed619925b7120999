// Unit tests for the corpus builder.
//
// Exercises loading, splitting and the gzip CSV row format against a
// temporary directory.

use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;

use spamfilter::corpus::builder::{build_dataset, TRAIN_FILE, VALIDATION_FILE};
use spamfilter::corpus::dataset::{load_collection, Label};
use spamfilter::features::{FeatureEncoder, VocabularySize};

const SAMPLE_CORPUS: &str = "\
ham\tGo until jurong point, crazy.. Available only in bugis n great world la e buffet...
ham\tOk lar... Joking wif u oni...
spam\tFree entry in 2 a wkly comp to win FA Cup final tkts 21st May 2005.
ham\tU dun say so early hor... U c already then say...
ham\tNah I don't think he goes to usf, he lives around here though
spam\tWINNER!! As a valued network customer you have been selected to receivea £900 prize reward!
ham\tEven my brother is not like to speak with me.
ham\t
spam\tHad your mobile 11 months or more? U R entitled to Update to the latest colour mobiles
ham\tI'm gonna be home soon and i don't want to talk about this stuff anymore tonight
";

fn read_gz_lines(path: &Path) -> Vec<String> {
    let file = std::fs::File::open(path).unwrap();
    let mut contents = String::new();
    GzDecoder::new(file).read_to_string(&mut contents).unwrap();
    contents.lines().map(str::to_string).collect()
}

fn write_corpus(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("SMSSpamCollection");
    std::fs::write(&path, SAMPLE_CORPUS).unwrap();
    path
}

#[test]
fn load_collection_reads_all_rows() {
    let dir = tempfile::tempdir().unwrap();
    let messages = load_collection(&write_corpus(dir.path())).unwrap();

    assert_eq!(messages.len(), 10);
    assert_eq!(messages.iter().filter(|m| m.label == Label::Spam).count(), 3);
    // A message can be empty; it still counts as a row
    assert_eq!(messages[7].text, "");
}

#[test]
fn load_collection_rejects_non_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad");
    std::fs::write(&path, [b'h', b'a', b'm', b'\t', 0xff, 0xfe]).unwrap();
    assert!(load_collection(&path).is_err());
}

#[test]
fn load_collection_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_collection(&dir.path().join("nope")).is_err());
}

#[test]
fn build_dataset_writes_split_files() {
    let dir = tempfile::tempdir().unwrap();
    let messages = load_collection(&write_corpus(dir.path())).unwrap();
    let out_dir = dir.path().join("out");
    let encoder = FeatureEncoder::new(VocabularySize::new(50).unwrap());

    let summary = build_dataset(messages, &out_dir, &encoder, 0.8, false).unwrap();

    assert_eq!(summary.train_rows, 8);
    assert_eq!(summary.validation_rows, 2);
    assert_eq!(summary.train_spam, 2);
    assert_eq!(summary.validation_spam, 1);
    assert_eq!(summary.vocabulary_size.get(), 50);
    assert_eq!(summary.train_path, out_dir.join(TRAIN_FILE));
    assert_eq!(summary.validation_path, out_dir.join(VALIDATION_FILE));

    let train = read_gz_lines(&summary.train_path);
    let validation = read_gz_lines(&summary.validation_path);
    assert_eq!(train.len(), 8);
    assert_eq!(validation.len(), 2);

    // label + N feature columns on every line
    for line in train.iter().chain(&validation) {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 51);
        assert!(fields[0] == "0" || fields[0] == "1");
        assert!(fields[1..].iter().all(|f| *f == "0.0" || *f == "1.0"));
        // index 0 is reserved
        assert_eq!(fields[1], "0.0");
    }
}

#[test]
fn dataset_rows_match_inference_encoding() {
    let dir = tempfile::tempdir().unwrap();
    let messages = load_collection(&write_corpus(dir.path())).unwrap();
    let encoder = FeatureEncoder::new(VocabularySize::new(50).unwrap());

    let summary = build_dataset(messages.clone(), dir.path(), &encoder, 0.8, false).unwrap();
    let train = read_gz_lines(&summary.train_path);

    // Row 2 is the first spam message
    let expected = encoder.encode(&[messages[2].text.as_str()]);
    let fields: Vec<&str> = train[2].split(',').collect();
    assert_eq!(fields[0], "1");
    let written: Vec<f64> = fields[1..].iter().map(|f| f.parse().unwrap()).collect();
    assert_eq!(written.as_slice(), expected.row(0).unwrap());
}

#[test]
fn empty_message_row_is_all_zero() {
    let dir = tempfile::tempdir().unwrap();
    let messages = load_collection(&write_corpus(dir.path())).unwrap();
    let encoder = FeatureEncoder::new(VocabularySize::new(20).unwrap());

    let summary = build_dataset(messages, dir.path(), &encoder, 0.8, false).unwrap();
    let train = read_gz_lines(&summary.train_path);

    assert_eq!(train[7], format!("0{}", ",0.0".repeat(20)));
}

#[test]
fn build_dataset_rejects_bad_ratio() {
    let dir = tempfile::tempdir().unwrap();
    let messages = load_collection(&write_corpus(dir.path())).unwrap();
    let encoder: FeatureEncoder = FeatureEncoder::default();
    assert!(build_dataset(messages, dir.path(), &encoder, 0.0, false).is_err());
}
