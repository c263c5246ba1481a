//! Line-preserving reader and writer for the INI dialect used by `~/.aws/config`.
//!
//! Every header, key/value line, comment and blank line that is not explicitly
//! replaced is written back exactly as it was read, so rendering an untouched
//! document reproduces the original bytes.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct DocumentParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("key/value pair appears before the first section header")]
    EntryOutsideSection,
    #[error("expected a section header or `key = value`, found `{0}`")]
    UnrecognizedLine(String),
    #[error("section header has an empty name")]
    EmptySectionName,
    #[error("key/value pair has an empty key")]
    EmptyKey,
    #[error("duplicate section [{0}]")]
    DuplicateSection(String),
    #[error("duplicate key `{key}` in section [{section}]")]
    DuplicateKey { section: String, key: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    pair: KeyValue,
    // `None` for entries written by this process; rendered canonically.
    raw: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum BodyLine {
    Entry(Entry),
    Raw(String),
}

impl BodyLine {
    fn is_blank(&self) -> bool {
        matches!(self, BodyLine::Raw(line) if line.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    header: Option<String>,
    body: Vec<BodyLine>,
}

impl Section {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            header: None,
            body: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> impl Iterator<Item = &KeyValue> {
        self.body.iter().filter_map(|line| match line {
            BodyLine::Entry(entry) => Some(&entry.pair),
            BodyLine::Raw(_) => None,
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries()
            .find(|pair| pair.key == key)
            .map(|pair| pair.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every existing key and writes `pairs` in their given order.
    ///
    /// Comment and blank lines that precede the first key stay in front of the
    /// new keys; the remaining ones follow them. A repeated key keeps its first
    /// position and takes the last value.
    pub fn replace_entries(&mut self, pairs: impl IntoIterator<Item = KeyValue>) {
        let mut unique: Vec<KeyValue> = Vec::new();
        for pair in pairs {
            match unique.iter_mut().find(|existing| existing.key == pair.key) {
                Some(existing) => existing.value = pair.value,
                None => unique.push(pair),
            }
        }

        let split = self
            .body
            .iter()
            .position(|line| matches!(line, BodyLine::Entry(_)))
            .unwrap_or_else(|| {
                self.body
                    .iter()
                    .rposition(|line| !line.is_blank())
                    .map_or(0, |index| index + 1)
            });
        let mut rest = self.body.split_off(split);
        rest.retain(|line| matches!(line, BodyLine::Raw(_)));

        self.body.extend(
            unique
                .into_iter()
                .map(|pair| BodyLine::Entry(Entry { pair, raw: None })),
        );
        self.body.extend(rest);
    }

    fn contains_key(&self, key: &str) -> bool {
        self.entries().any(|pair| pair.key == key)
    }

    fn render_into(&self, lines: &mut Vec<String>) {
        match &self.header {
            Some(raw) => lines.push(raw.clone()),
            None => lines.push(format!("[{}]", self.name)),
        }
        for line in &self.body {
            match line {
                BodyLine::Raw(raw) => lines.push(raw.clone()),
                BodyLine::Entry(Entry { raw: Some(raw), .. }) => lines.extend(raw.iter().cloned()),
                BodyLine::Entry(Entry { pair, raw: None }) => render_pair(pair, lines),
            }
        }
    }
}

fn render_pair(pair: &KeyValue, lines: &mut Vec<String>) {
    let mut value_lines = pair.value.split('\n');
    let first = value_lines.next().unwrap_or_default();
    if first.is_empty() {
        lines.push(format!("{} =", pair.key));
    } else {
        lines.push(format!("{} = {}", pair.key, first));
    }
    for continuation in value_lines {
        lines.push(format!("    {continuation}"));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    preamble: Vec<String>,
    sections: Vec<Section>,
    line_ending: LineEnding,
    trailing_newline: bool,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self {
            preamble: Vec::new(),
            sections: Vec::new(),
            line_ending: LineEnding::Lf,
            trailing_newline: true,
        }
    }
}

impl ConfigDocument {
    pub fn parse(text: &str) -> Result<Self, DocumentParseError> {
        if text.is_empty() {
            return Ok(Self::default());
        }

        let line_ending = if text.contains("\r\n") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        };
        let trailing_newline = text.ends_with('\n');
        let mut raw_lines: Vec<&str> = text.split('\n').collect();
        if trailing_newline {
            raw_lines.pop();
        }

        let mut doc = Self {
            preamble: Vec::new(),
            sections: Vec::new(),
            line_ending,
            trailing_newline,
        };

        for (index, raw) in raw_lines.into_iter().enumerate() {
            let line = match line_ending {
                LineEnding::CrLf => raw.strip_suffix('\r').unwrap_or(raw),
                LineEnding::Lf => raw,
            };
            doc.parse_line(index + 1, line)?;
        }
        Ok(doc)
    }

    fn parse_line(&mut self, line_number: usize, line: &str) -> Result<(), DocumentParseError> {
        let fail = |kind: ParseErrorKind| DocumentParseError {
            line: line_number,
            kind,
        };
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            match self.sections.last_mut() {
                Some(section) => section.body.push(BodyLine::Raw(line.to_string())),
                None => self.preamble.push(line.to_string()),
            }
            return Ok(());
        }

        if line.starts_with(char::is_whitespace) {
            if let Some(BodyLine::Entry(entry)) = self
                .sections
                .last_mut()
                .and_then(|section| section.body.last_mut())
            {
                entry.pair.value.push('\n');
                entry.pair.value.push_str(trimmed);
                if let Some(raw) = entry.raw.as_mut() {
                    raw.push(line.to_string());
                }
                return Ok(());
            }
        }

        if let Some(header) = trimmed.strip_prefix('[') {
            // Only whitespace or an inline comment may follow the closing bracket.
            let name = header
                .split_once(']')
                .filter(|(_, rest)| {
                    let rest = rest.trim_start();
                    rest.is_empty() || rest.starts_with('#') || rest.starts_with(';')
                })
                .map(|(name, _)| name.trim())
                .ok_or_else(|| fail(ParseErrorKind::UnrecognizedLine(trimmed.to_string())))?;
            if name.is_empty() {
                return Err(fail(ParseErrorKind::EmptySectionName));
            }
            if self.has_section(name) {
                return Err(fail(ParseErrorKind::DuplicateSection(name.to_string())));
            }
            self.sections.push(Section {
                name: name.to_string(),
                header: Some(line.to_string()),
                body: Vec::new(),
            });
            return Ok(());
        }

        let Some(separator) = trimmed.find(|c| c == '=' || c == ':') else {
            return Err(fail(ParseErrorKind::UnrecognizedLine(trimmed.to_string())));
        };
        let key = trimmed[..separator].trim();
        let value = trimmed[separator + 1..].trim();
        let Some(section) = self.sections.last_mut() else {
            return Err(fail(ParseErrorKind::EntryOutsideSection));
        };
        if key.is_empty() {
            return Err(fail(ParseErrorKind::EmptyKey));
        }
        if section.contains_key(key) {
            return Err(fail(ParseErrorKind::DuplicateKey {
                section: section.name.clone(),
                key: key.to_string(),
            }));
        }
        section.body.push(BodyLine::Entry(Entry {
            pair: KeyValue::new(key, value),
            raw: Some(vec![line.to_string()]),
        }));
        Ok(())
    }

    pub fn render(&self) -> String {
        let mut lines = self.preamble.clone();
        for section in &self.sections {
            if section.header.is_none() && lines.last().is_some_and(|l| !l.trim().is_empty()) {
                lines.push(String::new());
            }
            section.render_into(&mut lines);
        }

        let newline = self.line_ending.as_str();
        let mut out = lines.join(newline);
        if self.trailing_newline && !lines.is_empty() {
            out.push_str(newline);
        }
        out
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|section| section.name == name)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    /// Returns the named section, appending an empty one at the end of the
    /// document when it does not exist yet.
    pub fn ensure_section(&mut self, name: &str) -> &mut Section {
        let index = match self.sections.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# managed by hand\n\n[default]\nregion = us-west-2\noutput=json\n\n[profile work]\n; work account\nregion = us-east-1\ns3 =\n    max_concurrent_requests = 20\n    multipart_threshold = 64MB\n\n[sso-session corp]\nsso_start_url = https://corp.awsapps.com/start\n";

    #[test]
    fn untouched_document_renders_byte_for_byte() {
        let doc = ConfigDocument::parse(SAMPLE).expect("parse sample");
        assert_eq!(doc.render(), SAMPLE);
    }

    #[test]
    fn crlf_and_missing_final_newline_survive_round_trip() {
        let text = "[profile a]\r\nregion = eu-west-1\r\n\r\n[profile b]\r\nregion=eu-north-1";
        let doc = ConfigDocument::parse(text).expect("parse crlf");
        assert_eq!(doc.render(), text);
    }

    #[test]
    fn sections_and_keys_keep_file_order() {
        let doc = ConfigDocument::parse(SAMPLE).expect("parse sample");
        let names = doc.sections().iter().map(Section::name).collect::<Vec<_>>();
        assert_eq!(names, vec!["default", "profile work", "sso-session corp"]);

        let default = doc.section("default").expect("default section");
        let keys = default.entries().map(|p| p.key.as_str()).collect::<Vec<_>>();
        assert_eq!(keys, vec!["region", "output"]);
        assert_eq!(default.get("output"), Some("json"));
    }

    #[test]
    fn indented_lines_continue_the_previous_value() {
        let doc = ConfigDocument::parse(SAMPLE).expect("parse sample");
        let work = doc.section("profile work").expect("work section");
        assert_eq!(
            work.get("s3"),
            Some("\nmax_concurrent_requests = 20\nmultipart_threshold = 64MB")
        );
        assert_eq!(work.len(), 2);
    }

    #[test]
    fn colon_separator_is_accepted() {
        let doc = ConfigDocument::parse("[profile a]\nregion: ap-south-1\n").expect("parse");
        assert_eq!(
            doc.section("profile a").and_then(|s| s.get("region")),
            Some("ap-south-1")
        );
    }

    #[test]
    fn parse_errors_report_line_numbers() {
        let err = ConfigDocument::parse("region = us-east-1\n").expect_err("outside section");
        assert_eq!(err.line, 1);
        assert_eq!(err.kind, ParseErrorKind::EntryOutsideSection);

        let err = ConfigDocument::parse("[a]\nx = 1\n[a]\n").expect_err("duplicate section");
        assert_eq!(err.line, 3);
        assert_eq!(err.kind, ParseErrorKind::DuplicateSection("a".to_string()));

        let err = ConfigDocument::parse("[a]\nx = 1\nx = 2\n").expect_err("duplicate key");
        assert_eq!(err.line, 3);
        assert!(matches!(err.kind, ParseErrorKind::DuplicateKey { .. }));

        let err = ConfigDocument::parse("[a]\njust words\n").expect_err("garbage");
        assert_eq!(err.line, 2);
        assert!(matches!(err.kind, ParseErrorKind::UnrecognizedLine(_)));

        let err = ConfigDocument::parse("[ ]\n").expect_err("empty name");
        assert_eq!(err.kind, ParseErrorKind::EmptySectionName);

        let err = ConfigDocument::parse("[a]\n= value\n").expect_err("empty key");
        assert_eq!(err.kind, ParseErrorKind::EmptyKey);
    }

    #[test]
    fn section_headers_accept_trailing_comments() {
        let text = "[profile a] # work account\nregion = x\n[profile b]\t; personal\n";
        let doc = ConfigDocument::parse(text).expect("parse");
        let names = doc.sections().iter().map(Section::name).collect::<Vec<_>>();
        assert_eq!(names, vec!["profile a", "profile b"]);
        assert_eq!(doc.render(), text);

        let err = ConfigDocument::parse("[profile a] trailing\n").expect_err("junk after header");
        assert_eq!(err.line, 1);
        assert_eq!(
            err.kind,
            ParseErrorKind::UnrecognizedLine("[profile a] trailing".to_string())
        );
    }

    #[test]
    fn replace_entries_keeps_comments_around_new_keys() {
        let mut doc = ConfigDocument::parse(
            "[default]\n# chosen by switcher\nregion = us-west-2\nfoo = bar\n\n[profile a]\nregion = x\n",
        )
        .expect("parse");
        doc.section_mut("default")
            .expect("default")
            .replace_entries([KeyValue::new("region", "us-east-1")]);
        assert_eq!(
            doc.render(),
            "[default]\n# chosen by switcher\nregion = us-east-1\n\n[profile a]\nregion = x\n"
        );
    }

    #[test]
    fn replace_entries_renders_multiline_values_indented() {
        let mut doc = ConfigDocument::parse("[default]\n").expect("parse");
        doc.section_mut("default").expect("default").replace_entries([
            KeyValue::new("s3", "\nmax_concurrent_requests = 20"),
            KeyValue::new("region", "us-east-1"),
        ]);
        assert_eq!(
            doc.render(),
            "[default]\ns3 =\n    max_concurrent_requests = 20\nregion = us-east-1\n"
        );
        let reparsed = ConfigDocument::parse(&doc.render()).expect("reparse");
        assert_eq!(
            reparsed.section("default").and_then(|s| s.get("s3")),
            Some("\nmax_concurrent_requests = 20")
        );
    }

    #[test]
    fn ensure_section_appends_after_a_blank_line() {
        let mut doc = ConfigDocument::parse("[profile a]\nregion = x").expect("parse");
        doc.ensure_section("default")
            .replace_entries([KeyValue::new("region", "x")]);
        assert_eq!(doc.render(), "[profile a]\nregion = x\n\n[default]\nregion = x");
        assert_eq!(doc.sections().len(), 2);

        doc.ensure_section("default");
        assert_eq!(doc.sections().len(), 2);
    }

    #[test]
    fn empty_document_gains_a_trailing_newline_when_written() {
        let mut doc = ConfigDocument::parse("").expect("parse empty");
        assert_eq!(doc.render(), "");
        doc.ensure_section("default")
            .replace_entries([KeyValue::new("output", "json")]);
        assert_eq!(doc.render(), "[default]\noutput = json\n");
    }
}
