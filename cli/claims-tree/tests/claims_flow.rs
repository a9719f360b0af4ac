use std::fs;

use alloy_primitives::U256;
use claims_tree::claims::{CLAIMS_FILE_NAME, VERIFICATION_FILE_NAME};
use claims_tree::{
    export, hex_encode, leaf_hash, load_records, parse_hash, verify, ClaimsFile, Error,
    MerkleTree, Record, VerificationFile,
};

const SAMPLE: &str = "\
address,index,amount
0x1234567890123456789012345678901234567890,0,100
0x2345678901234567890123456789012345678901,1,200
0x3456789012345678901234567890123456789012,2,300
0x4567890123456789012345678901234567890123,3,400
";

#[test]
fn build_export_lookup_verify() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("rewards.csv");
    fs::write(&input, SAMPLE).unwrap();

    let records = load_records(&input).unwrap();
    assert_eq!(records.len(), 4);

    let export = export(records.clone()).unwrap();
    export
        .claims
        .save(&dir.path().join(CLAIMS_FILE_NAME))
        .unwrap();
    export
        .verification
        .save(&dir.path().join(VERIFICATION_FILE_NAME))
        .unwrap();

    let claims = ClaimsFile::load(&dir.path().join(CLAIMS_FILE_NAME)).unwrap();
    let root = claims.root().unwrap();
    assert_eq!(root, export.tree.root());

    for record in &records {
        let lookup = claims.lookup(&hex_encode(record.address)).unwrap();
        assert_eq!(lookup.record().unwrap(), *record);
        assert_eq!(lookup.proof.len(), 2);
        assert!(verify(record, &lookup.proof_hashes().unwrap(), &root));
    }

    let last = claims
        .lookup("0x4567890123456789012345678901234567890123")
        .unwrap();
    let mut tampered = last.record().unwrap();
    tampered.amount = U256::from(401u64);
    assert!(!verify(&tampered, &last.proof_hashes().unwrap(), &root));

    let replayed = VerificationFile::load(&dir.path().join(VERIFICATION_FILE_NAME))
        .unwrap()
        .replay()
        .unwrap();
    assert_eq!(replayed.root(), root);
}

#[test]
fn json_and_csv_inputs_agree() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("rewards.csv");
    let json = dir.path().join("rewards.json");
    fs::write(&csv, SAMPLE).unwrap();
    fs::write(
        &json,
        r#"[
  {"address": "0x1234567890123456789012345678901234567890", "index": 0, "amount": 100},
  {"address": "0x2345678901234567890123456789012345678901", "index": 1, "amount": "200"},
  {"address": "0x3456789012345678901234567890123456789012", "index": 2, "amount": 300},
  {"address": "0x4567890123456789012345678901234567890123", "index": 3, "amount": "400"}
]"#,
    )
    .unwrap();

    let from_csv = MerkleTree::build(load_records(&csv).unwrap()).unwrap();
    let from_json = MerkleTree::build(load_records(&json).unwrap()).unwrap();
    assert_eq!(from_csv.root(), from_json.root());
}

#[test]
fn unknown_address_is_not_found() {
    let records = vec![Record::new([0x11; 20], 0, U256::from(5u64))];
    let export = export(records).unwrap();
    let err = export
        .claims
        .lookup("0x2222222222222222222222222222222222222222")
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn single_record_root_is_its_leaf() {
    let record = Record::new([0x11; 20], 42, U256::MAX);
    let export = export(vec![record]).unwrap();
    assert_eq!(export.tree.root(), leaf_hash(&record));
    assert_eq!(
        parse_hash(&export.claims.merkle_root).unwrap(),
        leaf_hash(&record)
    );
    assert!(export.claims.claims.values().all(|c| c.proof.is_empty()));
}

#[test]
fn odd_sized_sets_verify_end_to_end() {
    let records: Vec<Record> = (0u8..11)
        .map(|i| Record::new([i + 1; 20], 1000 - i as u64, U256::from(i as u64) << 200usize))
        .collect();
    let export = export(records).unwrap();
    for address in export.claims.claims.keys() {
        assert!(export.claims.verify_claim(address).unwrap());
    }
}

#[test]
fn empty_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("rewards.csv");
    fs::write(&input, "address,index,amount\n").unwrap();
    let records = load_records(&input).unwrap();
    assert!(matches!(export(records), Err(Error::EmptyTree)));
}
