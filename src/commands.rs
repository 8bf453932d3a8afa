//! Command dispatch table and the mutation whitelist the journal consults.
//!
//! This is the external-collaborator surface spec.md treats as a black box:
//! a map from uppercased command name to a handler over [`Keyspace`], plus a
//! predicate the dispatcher checks before deciding whether to journal a
//! request. Neither piece is part of the durability contract itself — the
//! journal only needs `is_mutating` and a way to re-frame the command it
//! already parsed.

use crate::keyspace::Keyspace;
use crate::wire::Frame;

/// Commands that mutate the keyspace and therefore must be journaled.
///
/// Exactly the spec.md §4.3 whitelist. `MSET` is included even though there
/// is no dedicated handler below — see the `MSET` arm of [`dispatch`] and
/// the corresponding decision in `DESIGN.md`.
const MUTATING: &[&str] = &[
    "SET", "MSET", "INCR", "INCRBY", "HSET", "LPUSH", "RPUSH", "LPOP", "RPOP", "SADD", "SREM",
];

/// Whether `name` (already uppercased) is in the mutation whitelist.
pub fn is_mutating(name: &str) -> bool {
    MUTATING.contains(&name)
}

fn error(msg: impl Into<String>) -> Frame {
    Frame::Error(msg.into())
}

fn wrong_arity(name: &str) -> Frame {
    error(format!("ERR wrong number of arguments for '{name}'"))
}

fn bulk_or_null(v: Option<Vec<u8>>) -> Frame {
    match v {
        Some(b) => Frame::Bulk(b),
        None => Frame::Null,
    }
}

/// Executes `name` with `args` against `keyspace`, returning the reply frame.
///
/// `name` must already be uppercased (as produced by [`Frame::as_command`]).
/// Unknown commands and arity mismatches produce an `Error` frame rather
/// than a panic — a malformed or unsupported request never takes down the
/// process.
pub fn dispatch(name: &str, args: &[Vec<u8>], keyspace: &Keyspace) -> Frame {
    match name {
        "PING" => Frame::Simple("PONG".into()),

        "SET" => match args {
            [key, value] => {
                keyspace.set(key, value.clone());
                Frame::Simple("OK".into())
            }
            _ => wrong_arity(name),
        },

        // No dedicated MSET handler existed in the system this is modeled
        // on; multi-key SET is expressed as repeated key/value pairs applied
        // with the same SET semantics, one pair at a time.
        "MSET" => {
            if args.is_empty() || args.len() % 2 != 0 {
                return wrong_arity(name);
            }
            for pair in args.chunks_exact(2) {
                keyspace.set(&pair[0], pair[1].clone());
            }
            Frame::Simple("OK".into())
        }

        "GET" => match args {
            [key] => bulk_or_null(keyspace.get(key)),
            _ => wrong_arity(name),
        },

        "MGET" => {
            if args.is_empty() {
                return wrong_arity(name);
            }
            let values = keyspace.mget(args);
            Frame::Array(values.into_iter().map(bulk_or_null).collect())
        }

        "INCR" => match args {
            [key] => match keyspace.incr(key) {
                Ok(n) => Frame::Integer(n),
                Err(e) => error(format!("ERR {e}")),
            },
            _ => wrong_arity(name),
        },

        "INCRBY" => match args {
            [key, delta] => match parse_i64(delta) {
                Some(delta) => match keyspace.incrby(key, delta) {
                    Ok(n) => Frame::Integer(n),
                    Err(e) => error(format!("ERR {e}")),
                },
                None => error("ERR value is not an integer or out of range"),
            },
            _ => wrong_arity(name),
        },

        "HSET" => match args {
            [key, field, value] => {
                keyspace.hset(key, field, value.clone());
                Frame::Integer(1)
            }
            _ => wrong_arity(name),
        },

        "HGET" => match args {
            [key, field] => bulk_or_null(keyspace.hget(key, field)),
            _ => wrong_arity(name),
        },

        "HGETALL" => match args {
            [key] => match keyspace.hgetall(key) {
                Some(pairs) => Frame::Array(
                    pairs
                        .into_iter()
                        .flat_map(|(f, v)| [Frame::Bulk(f), Frame::Bulk(v)])
                        .collect(),
                ),
                None => Frame::Array(Vec::new()),
            },
            _ => wrong_arity(name),
        },

        "SADD" => match args {
            [key, members @ ..] if !members.is_empty() => {
                Frame::Integer(keyspace.sadd(key, members.to_vec()) as i64)
            }
            _ => wrong_arity(name),
        },

        "SREM" => match args {
            [key, members @ ..] if !members.is_empty() => {
                Frame::Integer(keyspace.srem(key, members) as i64)
            }
            _ => wrong_arity(name),
        },

        "SISMEMBER" => match args {
            [key, member] => Frame::Integer(keyspace.sismember(key, member) as i64),
            _ => wrong_arity(name),
        },

        "SCARD" => match args {
            [key] => Frame::Integer(keyspace.scard(key) as i64),
            _ => wrong_arity(name),
        },

        "LPUSH" => match args {
            [key, values @ ..] if !values.is_empty() => {
                Frame::Integer(keyspace.lpush(key, values.to_vec()) as i64)
            }
            _ => wrong_arity(name),
        },

        "RPUSH" => match args {
            [key, values @ ..] if !values.is_empty() => {
                Frame::Integer(keyspace.rpush(key, values.to_vec()) as i64)
            }
            _ => wrong_arity(name),
        },

        "LPOP" => match args {
            [key] => bulk_or_null(keyspace.lpop(key)),
            _ => wrong_arity(name),
        },

        "RPOP" => match args {
            [key] => bulk_or_null(keyspace.rpop(key)),
            _ => wrong_arity(name),
        },

        "LLEN" => match args {
            [key] => Frame::Integer(keyspace.llen(key) as i64),
            _ => wrong_arity(name),
        },

        "LINDEX" => match args {
            [key, index] => match parse_i64(index) {
                Some(i) => bulk_or_null(keyspace.lindex(key, i)),
                None => error("ERR value is not an integer or out of range"),
            },
            _ => wrong_arity(name),
        },

        "LRANGE" => match args {
            [key, start, stop] => match (parse_i64(start), parse_i64(stop)) {
                (Some(start), Some(stop)) => {
                    Frame::Array(keyspace.lrange(key, start, stop).into_iter().map(Frame::Bulk).collect())
                }
                _ => error("ERR value is not an integer or out of range"),
            },
            _ => wrong_arity(name),
        },

        other => error(format!("ERR unknown command '{other}'")),
    }
}

fn parse_i64(bytes: &[u8]) -> Option<i64> {
    std::str::from_utf8(bytes).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutation_whitelist_matches_spec() {
        for name in [
            "SET", "MSET", "INCR", "INCRBY", "HSET", "LPUSH", "RPUSH", "LPOP", "RPOP", "SADD",
            "SREM",
        ] {
            assert!(is_mutating(name), "{name} should be in the whitelist");
        }
        for name in ["GET", "MGET", "HGET", "HGETALL", "SISMEMBER", "SCARD", "LLEN", "LINDEX", "LRANGE", "PING"] {
            assert!(!is_mutating(name), "{name} should not be in the whitelist");
        }
    }

    #[test]
    fn set_then_get_round_trips() {
        let ks = Keyspace::new();
        assert_eq!(dispatch("SET", &[b"k".to_vec(), b"v".to_vec()], &ks), Frame::Simple("OK".into()));
        assert_eq!(dispatch("GET", &[b"k".to_vec()], &ks), Frame::Bulk(b"v".to_vec()));
    }

    #[test]
    fn get_missing_key_is_null() {
        let ks = Keyspace::new();
        assert_eq!(dispatch("GET", &[b"missing".to_vec()], &ks), Frame::Null);
    }

    #[test]
    fn incr_on_non_integer_surfaces_type_error() {
        let ks = Keyspace::new();
        dispatch("SET", &[b"k".to_vec(), b"nope".to_vec()], &ks);
        assert_eq!(
            dispatch("INCR", &[b"k".to_vec()], &ks),
            Frame::Error("ERR value is not an integer".into())
        );
    }

    #[test]
    fn wrong_arity_does_not_panic() {
        let ks = Keyspace::new();
        assert!(matches!(dispatch("SET", &[b"only_one".to_vec()], &ks), Frame::Error(_)));
    }

    #[test]
    fn unknown_command_is_an_error_not_a_panic() {
        let ks = Keyspace::new();
        assert!(matches!(dispatch("FLUSHALL", &[], &ks), Frame::Error(_)));
    }
}
