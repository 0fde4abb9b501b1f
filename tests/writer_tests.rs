use std::io;
use yocton::{Indent, PropertyKind, Stream, Writer, WriterOptions};

#[derive(Debug, PartialEq)]
enum Event {
    Field(Vec<u8>, Vec<u8>),
    Begin(Vec<u8>),
    End,
}

fn read_events(input: &[u8]) -> Vec<Event> {
    fn walk<S: yocton::ByteSource>(object: yocton::Object<'_, S>, out: &mut Vec<Event>) {
        while let Some(prop) = object.next_property() {
            match prop.kind() {
                PropertyKind::String => out.push(Event::Field(
                    prop.name_bytes().to_vec(),
                    prop.value_bytes().to_vec(),
                )),
                PropertyKind::Object => {
                    out.push(Event::Begin(prop.name_bytes().to_vec()));
                    walk(prop.inner(), out);
                    out.push(Event::End);
                }
            }
        }
    }

    let stream = Stream::from_slice(input);
    let mut out = Vec::new();
    walk(stream.root(), &mut out);
    assert!(stream.error().is_none(), "{:?}", stream.error());
    out
}

fn write_events(events: &[Event]) -> Vec<u8> {
    let mut writer = Writer::new(Vec::new());
    for event in events {
        match event {
            Event::Field(name, value) => writer.field(name, value),
            Event::Begin(name) => writer.begin_subobject(name),
            Event::End => writer.end_subobject(),
        }
    }
    writer.into_inner().unwrap()
}

#[test]
fn test_writer_output_format() {
    let mut writer = Writer::new(Vec::new());
    writer.field("title", "Hello, world");
    writer.begin_subobject("window");
    writer.field("width", "640");
    writer.begin_subobject("inner object");
    writer.field("", "empty name");
    writer.end_subobject();
    writer.end_subobject();
    let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    assert_eq!(
        out,
        "title: \"Hello, world\"\n\
         window {\n\
         \twidth: 640\n\
         \t\"inner object\" {\n\
         \t\t\"\": \"empty name\"\n\
         \t}\n\
         }\n"
    );
}

#[test]
fn test_round_trip_with_control_bytes() {
    let events = vec![
        Event::Field(b"plain".to_vec(), b"value".to_vec()),
        Event::Field(b"ctl".to_vec(), b"a\x01b\x07c\x1bd\re\nf\tg".to_vec()),
        Event::Field(b"quotes".to_vec(), b"\"\\\"".to_vec()),
        Event::Begin(b"nested {}".to_vec()),
        Event::Field(b"utf8".to_vec(), "naïve ✓".as_bytes().to_vec()),
        Event::Begin(b"deeper".to_vec()),
        Event::End,
        Event::End,
        Event::Field(b"".to_vec(), b"".to_vec()),
    ];

    let written = write_events(&events);
    assert_eq!(read_events(&written), events);
}

// NUL is the one byte a written value cannot carry back through the reader.
#[test]
fn test_nul_byte_does_not_round_trip() {
    let mut writer = Writer::new(Vec::new());
    writer.field("before", "ok");
    writer.field("nul", b"a\0b");
    let written = writer.into_inner().unwrap();
    assert_eq!(written, b"before: ok\nnul: \"a\\x00b\"\n");

    let stream = Stream::from_slice(&written);
    let root = stream.root();
    assert_eq!(root.next_property().unwrap().value(), "ok");
    assert!(root.next_property().is_none());
    let err = stream.error().unwrap();
    assert_eq!(err.message(), "NUL byte not allowed in \\x escape sequence");
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_spaces_indent() {
    let options = WriterOptions::new().with_indent(Indent::Spaces(4));
    let mut writer = Writer::with_options(Vec::new(), options);
    writer.begin_subobject("a");
    writer.begin_subobject("b");
    writer.field("c", "d");
    writer.end_subobject();
    writer.end_subobject();
    assert_eq!(
        writer.into_inner().unwrap(),
        b"a {\n    b {\n        c: d\n    }\n}\n"
    );
}

#[test]
fn test_unbalanced_end() {
    let mut writer = Writer::new(Vec::new());
    writer.begin_subobject("a");
    writer.end_subobject();
    assert_eq!(writer.level(), 0);
    writer.end_subobject();
    assert!(writer.has_error());
    assert_eq!(
        writer.error().unwrap().message(),
        "end_subobject called at top level"
    );
}

struct LimitedSink {
    written: Vec<u8>,
    limit: usize,
}

impl io::Write for LimitedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written.len() + buf.len() > self.limit {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "disk full"));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_sink_error_stops_output() {
    let options = WriterOptions::new().with_buffer_size(4);
    let mut writer = Writer::with_options(
        LimitedSink {
            written: Vec::new(),
            limit: 10,
        },
        options,
    );
    for i in 0..10 {
        writer.field("key", i.to_string());
    }
    let err = writer.flush().unwrap_err();
    assert!(matches!(err, yocton::Error::Io { .. }));
    assert!(err.to_string().ends_with("I/O error: disk full"));
    assert!(writer.get_ref().written.len() <= 10);
    assert!(writer.into_inner().is_err());
}
