// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Compact JSON token stream writer.
//!
//! The compiler drives this writer one token at a time (start object,
//! field name, scalar, end object) while walking the expression tree.
//! Output is always compact: no whitespace, keys in the order written.
//! Comma placement is handled by an internal container stack so deeply
//! nested bool groups stay well-formed without the caller tracking
//! position.
//!
//! String escaping and float formatting delegate to `serde_json` so the
//! output matches the engine wire format exactly (e.g. a boost of `2`
//! renders as `2.0`).

use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

#[derive(Debug)]
struct Frame {
    container: Container,
    count: usize,
}

/// Streaming JSON generator over any [`io::Write`] sink.
#[derive(Debug)]
pub struct JsonWriter<W: Write> {
    out: W,
    stack: Vec<Frame>,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            stack: Vec::with_capacity(8),
        }
    }

    /// Comma bookkeeping for a value in array position. Values in object
    /// position follow a `field_name` call which already placed the comma.
    fn begin_value(&mut self) -> io::Result<()> {
        if let Some(top) = self.stack.last_mut() {
            if top.container == Container::Array {
                if top.count > 0 {
                    self.out.write_all(b",")?;
                }
                top.count += 1;
            }
        }
        Ok(())
    }

    fn write_escaped(&mut self, s: &str) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, s).map_err(io::Error::from)
    }

    pub fn start_object(&mut self) -> io::Result<()> {
        self.begin_value()?;
        self.stack.push(Frame {
            container: Container::Object,
            count: 0,
        });
        self.out.write_all(b"{")
    }

    pub fn end_object(&mut self) -> io::Result<()> {
        self.stack.pop();
        self.out.write_all(b"}")
    }

    pub fn start_array(&mut self) -> io::Result<()> {
        self.begin_value()?;
        self.stack.push(Frame {
            container: Container::Array,
            count: 0,
        });
        self.out.write_all(b"[")
    }

    pub fn end_array(&mut self) -> io::Result<()> {
        self.stack.pop();
        self.out.write_all(b"]")
    }

    pub fn field_name(&mut self, name: &str) -> io::Result<()> {
        if let Some(top) = self.stack.last_mut() {
            if top.count > 0 {
                self.out.write_all(b",")?;
            }
            top.count += 1;
        }
        self.write_escaped(name)?;
        self.out.write_all(b":")
    }

    /// `"name":{` in one call, mirroring the field-then-object pattern the
    /// compiler uses for every wrapper construct.
    pub fn object_field_start(&mut self, name: &str) -> io::Result<()> {
        self.field_name(name)?;
        self.start_object()
    }

    /// `"name":[` in one call.
    pub fn array_field_start(&mut self, name: &str) -> io::Result<()> {
        self.field_name(name)?;
        self.start_array()
    }

    pub fn write_string(&mut self, value: &str) -> io::Result<()> {
        self.begin_value()?;
        self.write_escaped(value)
    }

    pub fn write_bool(&mut self, value: bool) -> io::Result<()> {
        self.begin_value()?;
        let token: &[u8] = if value { b"true" } else { b"false" };
        self.out.write_all(token)
    }

    pub fn write_u64(&mut self, value: u64) -> io::Result<()> {
        self.begin_value()?;
        write!(self.out, "{}", value)
    }

    pub fn write_i64(&mut self, value: i64) -> io::Result<()> {
        self.begin_value()?;
        write!(self.out, "{}", value)
    }

    /// Finite floats only. `serde_json::Number` formatting keeps the
    /// fractional part (`2.0`, not `2`), which the engine wire format
    /// and byte-comparing callers rely on.
    pub fn write_f64(&mut self, value: f64) -> io::Result<()> {
        self.begin_value()?;
        match serde_json::Number::from_f64(value) {
            Some(n) => write!(self.out, "{}", n),
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "non-finite float in query document",
            )),
        }
    }

    pub fn string_field(&mut self, name: &str, value: &str) -> io::Result<()> {
        self.field_name(name)?;
        self.write_string(value)
    }

    pub fn bool_field(&mut self, name: &str, value: bool) -> io::Result<()> {
        self.field_name(name)?;
        self.write_bool(value)
    }

    pub fn u64_field(&mut self, name: &str, value: u64) -> io::Result<()> {
        self.field_name(name)?;
        self.write_u64(value)
    }

    /// Verbatim bytes, no comma bookkeeping. The caller owns placement.
    pub fn write_raw(&mut self, raw: &str) -> io::Result<()> {
        self.out.write_all(raw.as_bytes())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl JsonWriter<Vec<u8>> {
    /// Finish writing and return the document text.
    pub fn into_string(self) -> io::Result<String> {
        String::from_utf8(self.out).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer() -> JsonWriter<Vec<u8>> {
        JsonWriter::new(Vec::new())
    }

    #[test]
    fn test_flat_object() {
        let mut w = writer();
        w.start_object().unwrap();
        w.u64_field("from", 3).unwrap();
        w.u64_field("size", 100).unwrap();
        w.string_field("status", "NEW").unwrap();
        w.end_object().unwrap();
        assert_eq!(
            w.into_string().unwrap(),
            r#"{"from":3,"size":100,"status":"NEW"}"#
        );
    }

    #[test]
    fn test_array_commas() {
        let mut w = writer();
        w.start_object().unwrap();
        w.array_field_start("values").unwrap();
        w.write_u64(1).unwrap();
        w.write_u64(2).unwrap();
        w.write_string("three").unwrap();
        w.end_array().unwrap();
        w.end_object().unwrap();
        assert_eq!(w.into_string().unwrap(), r#"{"values":[1,2,"three"]}"#);
    }

    #[test]
    fn test_nested_bool_protocol() {
        // open bool object -> open must_not array -> child -> close both
        let mut w = writer();
        w.start_object().unwrap();
        w.object_field_start("bool").unwrap();
        w.array_field_start("must_not").unwrap();
        w.start_object().unwrap();
        w.object_field_start("term").unwrap();
        w.string_field("status", "CLOSED").unwrap();
        w.end_object().unwrap();
        w.end_object().unwrap();
        w.end_array().unwrap();
        w.end_object().unwrap();
        w.end_object().unwrap();
        assert_eq!(
            w.into_string().unwrap(),
            r#"{"bool":{"must_not":[{"term":{"status":"CLOSED"}}]}}"#
        );
    }

    #[test]
    fn test_objects_in_array_get_commas() {
        let mut w = writer();
        w.start_array().unwrap();
        w.start_object().unwrap();
        w.u64_field("a", 1).unwrap();
        w.end_object().unwrap();
        w.start_object().unwrap();
        w.u64_field("b", 2).unwrap();
        w.end_object().unwrap();
        w.end_array().unwrap();
        assert_eq!(w.into_string().unwrap(), r#"[{"a":1},{"b":2}]"#);
    }

    #[test]
    fn test_string_escaping() {
        let mut w = writer();
        w.start_object().unwrap();
        w.string_field("name", "say \"hi\"\n").unwrap();
        w.end_object().unwrap();
        assert_eq!(w.into_string().unwrap(), r#"{"name":"say \"hi\"\n"}"#);
    }

    #[test]
    fn test_float_keeps_fraction() {
        let mut w = writer();
        w.write_f64(2.0).unwrap();
        assert_eq!(w.into_string().unwrap(), "2.0");
    }

    #[test]
    fn test_non_finite_float_rejected() {
        let mut w = writer();
        assert!(w.write_f64(f64::NAN).is_err());
    }

    #[test]
    fn test_write_raw_verbatim() {
        let mut w = writer();
        w.write_raw(r#"{"match_all":{}}"#).unwrap();
        assert_eq!(w.into_string().unwrap(), r#"{"match_all":{}}"#);
    }

    /// A sink that always fails
    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_failure_surfaces_as_io_error() {
        let mut w = JsonWriter::new(BrokenSink);
        let err = w.start_object().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
