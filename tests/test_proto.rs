use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use zkmulti::proto::{ReadFrom, TransactionRequest, TransactionResponse, WriteTo};
use zkmulti::*;

fn read_string(reader: &mut Cursor<Vec<u8>>) -> String {
    let len = reader.read_i32::<BigEndian>().unwrap() as usize;
    let mut raw = vec![0; len];
    std::io::Read::read_exact(reader, &mut raw).unwrap();
    String::from_utf8(raw).unwrap()
}

fn write_header(buf: &mut Vec<u8>, type_code: i32, done: bool, err: i32) {
    buf.write_i32::<BigEndian>(type_code).unwrap();
    buf.write_u8(done as u8).unwrap();
    buf.write_i32::<BigEndian>(err).unwrap();
}

fn write_string(buf: &mut Vec<u8>, s: &str) {
    buf.write_i32::<BigEndian>(s.len() as i32).unwrap();
    buf.extend_from_slice(s.as_bytes());
}

fn write_stat(buf: &mut Vec<u8>, version: i32) {
    buf.write_i64::<BigEndian>(10).unwrap(); // czxid
    buf.write_i64::<BigEndian>(11).unwrap(); // mzxid
    buf.write_i64::<BigEndian>(0).unwrap(); // ctime
    buf.write_i64::<BigEndian>(0).unwrap(); // mtime
    buf.write_i32::<BigEndian>(version).unwrap();
    buf.write_i32::<BigEndian>(0).unwrap(); // cversion
    buf.write_i32::<BigEndian>(0).unwrap(); // aversion
    buf.write_i64::<BigEndian>(0).unwrap(); // ephemeral_owner
    buf.write_i32::<BigEndian>(2).unwrap(); // data_length
    buf.write_i32::<BigEndian>(0).unwrap(); // num_children
    buf.write_i64::<BigEndian>(11).unwrap(); // pzxid
}

#[test]
fn request_framing_matches_the_wire_format() {
    let ops = vec![
        Op::Check {
            path: "/a".to_string(),
            version: Some(3),
        },
        Op::Delete {
            path: "/b".to_string(),
            version: None,
        },
    ];
    let mut buf = Vec::new();
    TransactionRequest { ops: &ops }.write_to(&mut buf).unwrap();

    let mut reader = Cursor::new(buf);

    // check entry: header {13, done=0, err=-1}, path, version
    assert_eq!(reader.read_i32::<BigEndian>().unwrap(), 13);
    assert_eq!(reader.read_u8().unwrap(), 0);
    assert_eq!(reader.read_i32::<BigEndian>().unwrap(), -1);
    assert_eq!(read_string(&mut reader), "/a");
    assert_eq!(reader.read_i32::<BigEndian>().unwrap(), 3);

    // delete entry: header {2, done=0, err=-1}, path, "any version" as -1
    assert_eq!(reader.read_i32::<BigEndian>().unwrap(), 2);
    assert_eq!(reader.read_u8().unwrap(), 0);
    assert_eq!(reader.read_i32::<BigEndian>().unwrap(), -1);
    assert_eq!(read_string(&mut reader), "/b");
    assert_eq!(reader.read_i32::<BigEndian>().unwrap(), -1);

    // closing entry: {-1, done=1, err=-1}, nothing after it
    assert_eq!(reader.read_i32::<BigEndian>().unwrap(), -1);
    assert_eq!(reader.read_u8().unwrap(), 1);
    assert_eq!(reader.read_i32::<BigEndian>().unwrap(), -1);
    let position = reader.position();
    assert_eq!(position, reader.into_inner().len() as u64);
}

#[test]
fn create_entry_carries_data_acl_and_mode() {
    let ops = vec![Op::Create {
        path: "/n".to_string(),
        data: vec![8, 8],
        acl: Acl::open_unsafe().clone(),
        mode: CreateMode::EphemeralSequential,
    }];
    let mut buf = Vec::new();
    TransactionRequest { ops: &ops }.write_to(&mut buf).unwrap();

    let mut reader = Cursor::new(buf);
    assert_eq!(reader.read_i32::<BigEndian>().unwrap(), 1); // create opcode
    assert_eq!(reader.read_u8().unwrap(), 0);
    assert_eq!(reader.read_i32::<BigEndian>().unwrap(), -1);
    assert_eq!(read_string(&mut reader), "/n");
    // data buffer
    assert_eq!(reader.read_i32::<BigEndian>().unwrap(), 2);
    assert_eq!(reader.read_u8().unwrap(), 8);
    assert_eq!(reader.read_u8().unwrap(), 8);
    // one world:anyone ACL with all permissions
    assert_eq!(reader.read_i32::<BigEndian>().unwrap(), 1);
    assert_eq!(reader.read_u32::<BigEndian>().unwrap(), 0b11111);
    assert_eq!(read_string(&mut reader), "world");
    assert_eq!(read_string(&mut reader), "anyone");
    // mode
    assert_eq!(reader.read_i32::<BigEndian>().unwrap(), 3);
}

#[test]
fn length_prefix_wraps_the_encoded_request() {
    let ops = vec![Op::Check {
        path: "/a".to_string(),
        version: None,
    }];
    let framed = TransactionRequest { ops: &ops }
        .to_len_prefixed_buf()
        .unwrap();

    let mut reader = Cursor::new(framed);
    let len = reader.read_i32::<BigEndian>().unwrap() as usize;
    assert_eq!(len, reader.into_inner().len() - 4);
}

#[test]
fn decodes_a_successful_response() {
    let mut buf = Vec::new();
    write_header(&mut buf, 1, false, -1); // create
    write_string(&mut buf, "/made-0000000001");
    write_header(&mut buf, 13, false, -1); // check
    write_header(&mut buf, 5, false, -1); // set_data
    write_stat(&mut buf, 7);
    write_header(&mut buf, 2, false, -1); // delete
    write_header(&mut buf, -1, true, -1); // closing

    let response = TransactionResponse::read_from(&mut Cursor::new(buf)).unwrap();

    assert_eq!(response.responses.len(), 4);
    assert_eq!(
        response.responses[0],
        OpResult::Create {
            path: "/made-0000000001".to_string(),
        }
    );
    assert_eq!(response.responses[1], OpResult::Ack);
    match &response.responses[2] {
        OpResult::SetData { stat } => assert_eq!(stat.version, 7),
        other => panic!("expected a set_data result, got {:?}", other),
    }
    assert_eq!(response.responses[3], OpResult::Ack);
}

#[test]
fn decodes_a_rejected_response_to_a_leading_error() {
    let mut buf = Vec::new();
    write_header(&mut buf, -1, false, -1); // error entry
    buf.write_i32::<BigEndian>(-103).unwrap(); // BadVersion
    write_header(&mut buf, -1, true, -1); // closing

    let response = TransactionResponse::read_from(&mut Cursor::new(buf)).unwrap();

    assert_eq!(
        response.responses,
        vec![OpResult::Error(ZkError::BadVersion)]
    );
}

#[test]
fn unknown_error_codes_in_a_response_classify_as_unimplemented() {
    let mut buf = Vec::new();
    write_header(&mut buf, -1, false, -1);
    buf.write_i32::<BigEndian>(-31337).unwrap();
    write_header(&mut buf, -1, true, -1);

    let response = TransactionResponse::read_from(&mut Cursor::new(buf)).unwrap();

    assert_eq!(
        response.responses,
        vec![OpResult::Error(ZkError::Unimplemented)]
    );
}

#[test]
fn unknown_response_tags_are_a_decode_error() {
    let mut buf = Vec::new();
    write_header(&mut buf, 99, false, -1);
    write_header(&mut buf, -1, true, -1);

    assert!(TransactionResponse::read_from(&mut Cursor::new(buf)).is_err());
}

#[test]
fn truncated_responses_are_a_decode_error() {
    let mut buf = Vec::new();
    write_header(&mut buf, 1, false, -1); // create entry, but no path follows

    assert!(TransactionResponse::read_from(&mut Cursor::new(buf)).is_err());
}
