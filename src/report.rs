use std::collections::BTreeMap;
use std::io::{ self, Write };

use crate::error::{ Result, SummaryError };
use crate::package::LicenseInfo;

const SEPARATOR: &str = "-------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Write the report for `licenses` in ascending name order
pub fn render<W: Write>(
    licenses: &BTreeMap<String, LicenseInfo>,
    format: ReportFormat,
    out: &mut W
) -> io::Result<()> {
    match format {
        ReportFormat::Text => render_text(licenses, out),
        ReportFormat::Json => render_json(licenses, out),
    }
}

/// Render into `out` and flush it; write failures become `SummaryError::Write`
pub fn write_report<W: Write>(
    licenses: &BTreeMap<String, LicenseInfo>,
    format: ReportFormat,
    out: &mut W
) -> Result<()> {
    render(licenses, format, out).map_err(SummaryError::Write)?;
    out.flush().map_err(SummaryError::Write)
}

fn render_text<W: Write>(licenses: &BTreeMap<String, LicenseInfo>, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", SEPARATOR)?;
    for info in licenses.values() {
        writeln!(out, "Name: {}", info.name)?;
        writeln!(out, "Authors: {}", info.authors.join(", "))?;
        writeln!(out, "Repository: {}", info.repository.as_deref().unwrap_or("None"))?;
        if let Some(license) = &info.license {
            writeln!(out, "License: {}", license)?;
        }
        writeln!(out, "License Text:")?;
        writeln!(out)?;
        writeln!(out, "{}", info.license_text)?;
        writeln!(out, "{}", SEPARATOR)?;
    }
    Ok(())
}

// One object per line, with the separating commas on lines of their own
fn render_json<W: Write>(licenses: &BTreeMap<String, LicenseInfo>, out: &mut W) -> io::Result<()> {
    writeln!(out, "[")?;
    let mut records = licenses.values().peekable();
    while let Some(info) = records.next() {
        serde_json::to_writer(&mut *out, info).map_err(io::Error::from)?;
        writeln!(out)?;
        if records.peek().is_some() {
            writeln!(out, ",")?;
        }
    }
    writeln!(out, "]")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn info(name: &str, license: Option<&str>, repository: Option<&str>) -> LicenseInfo {
        LicenseInfo {
            name: name.to_string(),
            authors: vec!["A <a@example.com>".to_string(), "B".to_string()],
            repository: repository.map(|r| r.to_string()),
            license: license.map(|l| l.to_string()),
            license_text: format!("{} license text", name),
        }
    }

    fn sample() -> BTreeMap<String, LicenseInfo> {
        // Inserted out of order on purpose
        [
            info("zeta", None, None),
            info("alpha", Some("MIT"), Some("https://github.com/acme/alpha")),
            info("Mid", Some("Apache-2.0"), None),
        ]
            .into_iter()
            .map(|i| (i.name.clone(), i))
            .collect()
    }

    /// Accepts `capacity` bytes, then fails every write.
    struct FullWriter {
        capacity: usize,
        written: Vec<u8>,
    }

    impl Write for FullWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written.len() >= self.capacity {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"));
            }
            let n = buf.len().min(self.capacity - self.written.len());
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn render_to_string(licenses: &BTreeMap<String, LicenseInfo>, format: ReportFormat) -> String {
        let mut buf = Vec::new();
        render(licenses, format, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_text_layout() {
        let mut licenses = BTreeMap::new();
        licenses.insert("alpha".to_string(), info("alpha", Some("MIT"), Some("https://github.com/acme/alpha")));
        licenses.insert("zeta".to_string(), info("zeta", None, None));

        let expected =
            "-------------\n\
             Name: alpha\n\
             Authors: A <a@example.com>, B\n\
             Repository: https://github.com/acme/alpha\n\
             License: MIT\n\
             License Text:\n\
             \n\
             alpha license text\n\
             -------------\n\
             Name: zeta\n\
             Authors: A <a@example.com>, B\n\
             Repository: None\n\
             License Text:\n\
             \n\
             zeta license text\n\
             -------------\n";
        assert_eq!(render_to_string(&licenses, ReportFormat::Text), expected);
    }

    #[test]
    fn test_text_empty() {
        assert_eq!(render_to_string(&BTreeMap::new(), ReportFormat::Text), "-------------\n");
    }

    #[test]
    fn test_json_is_valid_array_in_text_order() {
        let licenses = sample();
        let json = render_to_string(&licenses, ReportFormat::Json);
        let parsed: Value = serde_json::from_str(&json).unwrap();

        let json_names: Vec<&str> = parsed
            .as_array()
            .unwrap()
            .iter()
            .map(|record| record["name"].as_str().unwrap())
            .collect();
        assert_eq!(json_names, vec!["Mid", "alpha", "zeta"]);

        let text = render_to_string(&licenses, ReportFormat::Text);
        let text_names: Vec<&str> = text
            .lines()
            .filter_map(|line| line.strip_prefix("Name: "))
            .collect();
        assert_eq!(text_names, json_names);

        let zeta = &parsed[2];
        assert_eq!(zeta["license"], Value::Null);
        assert_eq!(zeta["repository"], Value::Null);
        assert_eq!(zeta["license_text"], "zeta license text");
    }

    #[test]
    fn test_json_line_layout() {
        let json = render_to_string(&sample(), ReportFormat::Json);
        let lines: Vec<&str> = json.lines().collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "[");
        assert!(lines[1].starts_with("{\"name\":\"Mid\""));
        assert_eq!(lines[2], ",");
        assert_eq!(lines[4], ",");
        assert!(lines[5].starts_with("{\"name\":\"zeta\""));
        assert_eq!(lines[6], "]");
    }

    #[test]
    fn test_json_empty_is_still_valid() {
        let json = render_to_string(&BTreeMap::new(), ReportFormat::Json);
        assert_eq!(json, "[\n]\n");
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.as_array().unwrap().is_empty());
    }

    #[test]
    fn test_write_failure_is_write_error() {
        for format in [ReportFormat::Text, ReportFormat::Json] {
            let mut out = FullWriter { capacity: 10, written: Vec::new() };
            let result = write_report(&sample(), format, &mut out);
            match result {
                Err(SummaryError::Write(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
                other => panic!("expected write error, got {:?}", other),
            }
        }

        let mut out = FullWriter { capacity: usize::MAX, written: Vec::new() };
        write_report(&sample(), ReportFormat::Json, &mut out).unwrap();
        let parsed: Value = serde_json::from_slice(&out.written).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 3);
    }
}
