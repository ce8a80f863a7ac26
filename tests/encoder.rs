use phpser::{encode, encode_into, Encoder, Value};
use phpser_strategy::*;
use proptest::prelude::*;

/// Walks one serialized value at the start of `b` and returns how many bytes it
/// spans, checking every length prefix and element count on the way.
fn skim(b: &[u8]) -> Result<usize, String> {
    fn number(b: &[u8], at: usize, end: u8) -> Result<(usize, usize), String> {
        let stop = b[at..]
            .iter()
            .position(|&c| c == end)
            .ok_or_else(|| format!("unterminated number at {}", at))?;
        let text = std::str::from_utf8(&b[at..at + stop]).map_err(|e| e.to_string())?;
        let n = text
            .parse::<usize>()
            .map_err(|_| format!("bad length {:?} at {}", text, at))?;
        Ok((n, at + stop + 1))
    }

    fn text_until(b: &[u8], at: usize) -> Result<usize, String> {
        let stop = b[at..]
            .iter()
            .position(|&c| c == b';')
            .ok_or_else(|| format!("unterminated token at {}", at))?;
        if stop == 0 {
            return Err(format!("empty token at {}", at));
        }
        Ok(at + stop + 1)
    }

    fn block(b: &[u8], at: usize, count: usize) -> Result<usize, String> {
        if b.get(at) != Some(&b'{') {
            return Err(format!("expected '{{' at {}", at));
        }
        let mut pos = at + 1;
        for _ in 0..count {
            match b.get(pos) {
                Some(b'N') | Some(b'i') | Some(b'd') | Some(b's') => {}
                other => return Err(format!("bad key {:?} at {}", other, pos)),
            }
            pos += skim(&b[pos..])?;
            pos += skim(&b[pos..])?;
        }
        if b.get(pos) != Some(&b'}') {
            return Err(format!("expected '}}' at {}, count was {}", pos, count));
        }
        Ok(pos + 1)
    }

    if b.len() < 2 || b[1] != b':' && b[0] != b'N' {
        return Err("truncated".into());
    }
    match b[0] {
        b'N' if b.starts_with(b"N;") => Ok(2),
        b'b' if b.starts_with(b"b:0;") || b.starts_with(b"b:1;") => Ok(4),
        b'i' | b'd' => text_until(b, 2),
        b's' => {
            let (len, at) = number(b, 2, b':')?;
            let end = at + 1 + len;
            if b.get(at) != Some(&b'"') || b.get(end..end + 2) != Some(&b"\";"[..]) {
                return Err(format!("string of {} bytes is not framed", len));
            }
            Ok(end + 2)
        }
        b'a' => {
            let (count, at) = number(b, 2, b':')?;
            block(b, at, count)
        }
        b'O' => {
            let (len, at) = number(b, 2, b':')?;
            let end = at + 1 + len;
            if b.get(at) != Some(&b'"') || b.get(end..end + 2) != Some(&b"\":"[..]) {
                return Err(format!("class name of {} bytes is not framed", len));
            }
            let (count, at) = number(b, end + 2, b':')?;
            block(b, at, count)
        }
        other => Err(format!("unknown tag {:?}", other as char)),
    }
}

#[test]
fn skim_accepts_the_grammar() {
    for ok in [
        &b"N;"[..],
        b"b:1;",
        b"i:-7;",
        b"d:0.5;",
        br#"s:5:"a;b:c";"#,
        br#"a:2:{i:0;N;s:1:"k";a:0:{}}"#,
        br#"O:1:"X":1:{s:1:"v";i:1;}"#,
    ] {
        assert_eq!(skim(ok), Ok(ok.len()), "{:?}", String::from_utf8_lossy(ok));
    }
    for bad in [
        &b"s:4:\"abc\";"[..],
        b"a:2:{i:0;N;}",
        b"a:1:{a:0:{}N;}",
        b"q:1;",
    ] {
        assert!(skim(bad).is_err(), "{:?}", String::from_utf8_lossy(bad));
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 1_000, ..ProptestConfig::default() })]

    #[test]
    fn well_formed(v in arb_value()) {
        let enc = encode(&v).unwrap();
        prop_assert_eq!(skim(&enc), Ok(enc.len()));
    }

    #[test]
    fn entry_points_agree(v in arb_value()) {
        let enc = encode(&v).unwrap();

        let mut out = b"i:0;".to_vec();
        encode_into(&v, &mut out).unwrap();
        prop_assert_eq!(&out[4..], &enc[..]);

        let mut encoder = Encoder::new(Vec::new());
        encoder.encode(&v).unwrap();
        prop_assert_eq!(encoder.into_inner(), enc);
    }

    #[test]
    fn text_length_is_byte_length(s in arb_bs()) {
        let enc = encode(&Value::from(s.clone())).unwrap();
        let head = format!("s:{}:\"", s.len());
        prop_assert!(enc.starts_with(head.as_bytes()));
        prop_assert_eq!(&enc[head.len()..enc.len() - 2], &s[..]);
        prop_assert!(enc.ends_with(b"\";"));
    }

    #[test]
    fn sequences_are_counted(xs in prop::collection::vec(any::<i32>(), 0..50)) {
        let enc = String::from_utf8(encode(&xs).unwrap()).unwrap();
        let head = format!("a:{}:{{", xs.len());
        prop_assert!(enc.starts_with(&head));
        for (i, x) in xs.iter().enumerate() {
            let entry = format!("i:{};i:{};", i, x);
            prop_assert!(enc.contains(&entry));
        }
    }

    #[test]
    fn string_text_is_utf8_bytes(s in any::<String>()) {
        let enc = encode(&s).unwrap();
        prop_assert_eq!(enc, format!("s:{}:\"{}\";", s.len(), s).into_bytes());
    }
}
