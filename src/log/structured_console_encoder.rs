use std::io;

use log::{
    Record,
    kv::{Error, Key, Value, VisitSource},
};
use log4rs::encode::{Color, Encode, Style, Write, pattern::PatternEncoder};
use serde::Deserialize;

const DEFAULT_PATTERN: &str = "{d} {l} {t} {m}";
const REDACTED: &str = "<REDACTED>";

/// Keys whose values are never written, whatever the caller logged.
const DEFAULT_REDACTED_KEYS: [&str; 4] = ["password", "seedphrase", "seed_phrase", "refresh_token"];

#[derive(Debug, Deserialize)]
pub struct StructuredConsoleEncoderConfig {
    pub pattern: Option<String>,
    /// Replaces the default redaction list when set.
    pub redact_keys: Option<Vec<String>>,
}

/// Pattern encoder that appends the record's key/values as ` key=value`.
#[derive(Debug)]
pub struct StructuredConsoleEncoder {
    delegate: PatternEncoder,
    redact_keys: Vec<String>,
}

impl StructuredConsoleEncoder {
    pub fn new(pattern: &str, redact_keys: Vec<String>) -> Self {
        Self {
            delegate: PatternEncoder::new(pattern),
            redact_keys,
        }
    }

    fn redacts(&self, key: &str) -> bool {
        self.redact_keys.iter().any(|k| k.eq_ignore_ascii_case(key))
    }
}

impl Encode for StructuredConsoleEncoder {
    fn encode(&self, w: &mut dyn Write, record: &Record) -> anyhow::Result<()> {
        self.delegate.encode(w, record)?;

        let mut visitor = PairWriter {
            encoder: self,
            writer: w,
            io_err: None,
        };
        if let Err(kv_err) = record.key_values().visit(&mut visitor) {
            if let Some(io_err) = visitor.io_err {
                return Err(io_err.into());
            }
            write!(w, " [KV Error: {}]", kv_err)?;
        }

        w.write_all(b"\n")?;
        Ok(())
    }
}

struct PairWriter<'a> {
    encoder: &'a StructuredConsoleEncoder,
    writer: &'a mut dyn Write,
    io_err: Option<io::Error>,
}

impl PairWriter<'_> {
    fn write_pair(&mut self, key: &Key<'_>, value: &Value<'_>) -> io::Result<()> {
        self.writer.set_style(Style::new().text(Color::Cyan))?;
        write!(self.writer, " {}=", key)?;
        self.writer.set_style(&Style::default())?;
        if self.encoder.redacts(key.as_str()) {
            self.writer.write_all(REDACTED.as_bytes())
        } else {
            write!(self.writer, "{}", value)
        }
    }
}

impl<'kvs> VisitSource<'kvs> for PairWriter<'_> {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> Result<(), Error> {
        self.write_pair(&key, &value).map_err(|e| {
            self.io_err = Some(e);
            Error::msg("io error during visit")
        })
    }
}

pub struct StructuredConsoleEncoderDeserializer;

impl log4rs::config::Deserialize for StructuredConsoleEncoderDeserializer {
    type Trait = dyn Encode;
    type Config = StructuredConsoleEncoderConfig;

    fn deserialize(
        &self,
        config: StructuredConsoleEncoderConfig,
        _: &log4rs::config::Deserializers,
    ) -> anyhow::Result<Box<dyn Encode>> {
        let pattern = config.pattern.as_deref().unwrap_or(DEFAULT_PATTERN);
        let redact_keys = config
            .redact_keys
            .unwrap_or_else(|| DEFAULT_REDACTED_KEYS.iter().map(|k| k.to_string()).collect());
        Ok(Box::new(StructuredConsoleEncoder::new(pattern, redact_keys)))
    }
}
