//! Round-trips a handful of commands through the wire frame codec and the
//! dispatch table together, the way a real connection would see them.

use std::io::Cursor;

use rekv::commands::dispatch;
use rekv::keyspace::Keyspace;
use rekv::wire::Frame;

fn send(keyspace: &Keyspace, name: &str, args: &[&[u8]]) -> Frame {
    let args: Vec<Vec<u8>> = args.iter().map(|a| a.to_vec()).collect();
    let request = Frame::command(name, &args);

    // Round-trip the request through the wire encoding, as a real client
    // connection would.
    let bytes = request.to_bytes();
    let mut cursor = Cursor::new(bytes);
    let decoded = Frame::decode(&mut cursor).unwrap();
    let (name, args) = decoded.as_command().unwrap();

    let reply = dispatch(&name, &args, keyspace);

    // The reply itself must also be byte-exact over the wire.
    let reply_bytes = reply.to_bytes();
    let mut reply_cursor = Cursor::new(reply_bytes);
    Frame::decode(&mut reply_cursor).unwrap()
}

#[test]
fn ping_replies_pong() {
    let keyspace = Keyspace::new();
    assert_eq!(send(&keyspace, "PING", &[]), Frame::Simple("PONG".into()));
}

#[test]
fn set_get_incr_sequence() {
    let keyspace = Keyspace::new();
    assert_eq!(send(&keyspace, "SET", &[b"counter", b"9"]), Frame::Simple("OK".into()));
    assert_eq!(send(&keyspace, "INCR", &[b"counter"]), Frame::Integer(10));
    assert_eq!(send(&keyspace, "GET", &[b"counter"]), Frame::Bulk(b"10".to_vec()));
}

#[test]
fn list_commands_compose_through_the_wire() {
    let keyspace = Keyspace::new();
    send(&keyspace, "RPUSH", &[b"L", b"a", b"b", b"c"]);
    send(&keyspace, "LPUSH", &[b"L", b"x", b"y"]);
    let reply = send(&keyspace, "LRANGE", &[b"L", b"0", b"-1"]);
    assert_eq!(
        reply,
        Frame::Array(vec![
            Frame::Bulk(b"y".to_vec()),
            Frame::Bulk(b"x".to_vec()),
            Frame::Bulk(b"a".to_vec()),
            Frame::Bulk(b"b".to_vec()),
            Frame::Bulk(b"c".to_vec()),
        ])
    );
}

#[test]
fn set_commands_report_cardinality_through_the_wire() {
    let keyspace = Keyspace::new();
    assert_eq!(send(&keyspace, "SADD", &[b"s", b"a", b"a", b"b"]), Frame::Integer(2));
    assert_eq!(send(&keyspace, "SADD", &[b"s", b"a"]), Frame::Integer(0));
    assert_eq!(send(&keyspace, "SCARD", &[b"s"]), Frame::Integer(2));
}

#[test]
fn unknown_command_and_bad_arity_surface_as_error_frames_not_panics() {
    let keyspace = Keyspace::new();
    assert!(matches!(send(&keyspace, "NOPE", &[]), Frame::Error(_)));
    assert!(matches!(send(&keyspace, "SET", &[b"only_one"]), Frame::Error(_)));
}
