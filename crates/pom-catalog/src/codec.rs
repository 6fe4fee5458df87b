//! gettext PO text codec.
//!
//! [`CatalogCodec`] is the boundary between catalog text and the in-memory
//! model. [`PoCodec`] implements it for the PO format:
//!
//! ```text
//! # translator comment
//! #. extracted comment
//! #: src/main.c:42
//! #, fuzzy, c-format
//! #| msgid "previous source"
//! msgctxt "menu"
//! msgid "Open"
//! msgstr "Öffnen"
//! ```
//!
//! Obsolete entries are prefixed with `#~`. Strings are written without
//! wrapping; a string containing newlines is split after each `\n`.

use tracing::debug;

use crate::catalog::Catalog;
use crate::entry::{Entry, EntryKey, EntryValue, FUZZY_FLAG};
use crate::error::{CodecError, CodecResult};
use crate::header::Header;

/// Converts between catalog text and [`Catalog`] values.
pub trait CatalogCodec: Send + Sync {
    /// Parse catalog text. `label` becomes the catalog's source label.
    fn parse(&self, text: &str, label: &str) -> CodecResult<Catalog>;

    /// Render a catalog back to text.
    fn serialize(&self, catalog: &Catalog) -> String;
}

/// The gettext PO codec.
#[derive(Clone, Copy, Debug, Default)]
pub struct PoCodec;

impl CatalogCodec for PoCodec {
    fn parse(&self, text: &str, label: &str) -> CodecResult<Catalog> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut parser = Parser::default();
        for (index, line) in text.lines().enumerate() {
            parser.line(index + 1, line)?;
        }
        let (header, entries) = parser.finish()?;

        debug!(label, entries = entries.len(), "parsed catalog");
        Ok(Catalog::from_parts(label, header.unwrap_or_default(), entries))
    }

    fn serialize(&self, catalog: &Catalog) -> String {
        let mut out = String::new();
        write_header(&mut out, catalog.header());
        for entry in catalog.entries() {
            out.push('\n');
            write_entry(&mut out, entry);
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Context,
    Id,
    Plural,
    Str(usize),
}

/// An entry under construction.
#[derive(Default)]
struct Draft {
    start: usize,
    translator_comments: Vec<String>,
    extracted_comments: Vec<String>,
    references: Vec<String>,
    flags: Vec<String>,
    previous: Vec<String>,
    context: Option<String>,
    msgid: Option<String>,
    msgid_plural: Option<String>,
    msgstr: Vec<(usize, String)>,
    obsolete: bool,
    current: Option<Field>,
}

impl Draft {
    fn has_keywords(&self) -> bool {
        self.context.is_some() || self.msgid.is_some()
    }

    fn touch(&mut self, line: usize) {
        if self.start == 0 {
            self.start = line;
        }
    }

    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Context => self.context = Some(value),
            Field::Id => self.msgid = Some(value),
            Field::Plural => self.msgid_plural = Some(value),
            Field::Str(index) => self.msgstr.push((index, value)),
        }
    }

    fn append(&mut self, field: Field, value: &str) {
        let target = match field {
            Field::Context => self.context.as_mut(),
            Field::Id => self.msgid.as_mut(),
            Field::Plural => self.msgid_plural.as_mut(),
            Field::Str(index) => self
                .msgstr
                .iter_mut()
                .rev()
                .find(|(i, _)| *i == index)
                .map(|(_, s)| s),
        };
        if let Some(target) = target {
            target.push_str(value);
        }
    }
}

#[derive(Default)]
struct Parser {
    draft: Draft,
    header: Option<Header>,
    entries: Vec<Entry>,
}

impl Parser {
    fn line(&mut self, line_no: usize, raw: &str) -> CodecResult<()> {
        let line = raw.trim();
        if line.is_empty() {
            if self.draft.has_keywords() {
                self.end_entry()?;
            }
            return Ok(());
        }

        if let Some(rest) = line.strip_prefix("#~") {
            let rest = rest.trim_start();
            if rest.is_empty() {
                return Ok(());
            }
            if rest.starts_with('|') {
                self.comment(line_no, rest)?;
            } else {
                self.keyword(line_no, rest)?;
            }
            self.draft.obsolete = true;
            return Ok(());
        }

        if let Some(rest) = line.strip_prefix('#') {
            return self.comment(line_no, rest);
        }

        self.keyword(line_no, line)
    }

    fn comment(&mut self, line_no: usize, rest: &str) -> CodecResult<()> {
        if self.draft.has_keywords() {
            self.end_entry()?;
        }
        let draft = &mut self.draft;
        draft.touch(line_no);

        let mut chars = rest.chars();
        match chars.next() {
            Some('.') => draft.extracted_comments.push(chars.as_str().trim().to_string()),
            Some(':') => draft
                .references
                .extend(chars.as_str().split_whitespace().map(str::to_string)),
            Some(',') => draft.flags.extend(
                chars
                    .as_str()
                    .split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(str::to_string),
            ),
            Some('|') => draft.previous.push(chars.as_str().trim_start().to_string()),
            _ => draft
                .translator_comments
                .push(rest.strip_prefix(' ').unwrap_or(rest).to_string()),
        }
        Ok(())
    }

    fn keyword(&mut self, line_no: usize, text: &str) -> CodecResult<()> {
        if text.starts_with('"') {
            let field = self.draft.current.ok_or_else(|| {
                CodecError::syntax(line_no, "string continuation without a keyword")
            })?;
            let value = parse_quoted(line_no, text)?;
            self.draft.append(field, &value);
            return Ok(());
        }

        let split = text
            .find(|c: char| c.is_whitespace() || c == '"')
            .unwrap_or(text.len());
        let (word, rest) = text.split_at(split);
        let field = match word {
            "msgctxt" => Field::Context,
            "msgid" => Field::Id,
            "msgid_plural" => Field::Plural,
            "msgstr" => Field::Str(0),
            _ => {
                let index = word
                    .strip_prefix("msgstr[")
                    .and_then(|w| w.strip_suffix(']'))
                    .ok_or_else(|| {
                        CodecError::syntax(line_no, format!("unknown keyword {word:?}"))
                    })?;
                let index = index.parse().map_err(|_| {
                    CodecError::syntax(line_no, format!("invalid plural index {index:?}"))
                })?;
                Field::Str(index)
            }
        };

        match field {
            Field::Context if self.draft.has_keywords() => self.end_entry()?,
            Field::Id if self.draft.msgid.is_some() => self.end_entry()?,
            Field::Plural | Field::Str(_) if self.draft.msgid.is_none() => {
                return Err(CodecError::syntax(line_no, format!("{word} before msgid")));
            }
            // Forms are numbered from 0 without gaps.
            Field::Str(index) if index > self.draft.msgstr.len() => {
                let expected = self.draft.msgstr.len();
                return Err(CodecError::syntax(
                    line_no,
                    format!("invalid plural index {index}, expected at most {expected}"),
                ));
            }
            _ => {}
        }

        let value = parse_quoted(line_no, rest)?;
        self.draft.touch(line_no);
        self.draft.set(field, value);
        self.draft.current = Some(field);
        Ok(())
    }

    fn end_entry(&mut self) -> CodecResult<()> {
        let draft = std::mem::take(&mut self.draft);
        let Some(msgid) = draft.msgid else {
            if draft.context.is_some() {
                return Err(CodecError::syntax(draft.start, "msgctxt without msgid"));
            }
            return Ok(());
        };
        if draft.msgstr.is_empty() {
            return Err(CodecError::MissingMsgstr {
                line: draft.start,
                msgid,
            });
        }

        if msgid.is_empty() && draft.context.is_none() && !draft.obsolete {
            if self.header.is_some() {
                return Err(CodecError::DuplicateHeader { line: draft.start });
            }
            let msgstr = draft.msgstr.into_iter().next().map(|(_, s)| s).unwrap_or_default();
            self.header = Some(Header {
                translator_comments: draft.translator_comments,
                extracted_comments: draft.extracted_comments,
                references: draft.references,
                flags: draft.flags,
                previous: draft.previous,
                msgstr,
            });
            return Ok(());
        }

        let mut msgstr = draft.msgstr;
        msgstr.sort_by_key(|(index, _)| *index);
        let mut forms = Vec::with_capacity(msgstr.len());
        for (index, value) in msgstr {
            if index >= forms.len() {
                forms.resize(index + 1, String::new());
            }
            forms[index] = value;
        }

        self.entries.push(Entry {
            key: EntryKey {
                context: draft.context,
                msgid,
            },
            msgid_plural: draft.msgid_plural,
            value: EntryValue::Translated(forms),
            translator_comments: draft.translator_comments,
            extracted_comments: draft.extracted_comments,
            references: draft.references,
            flags: draft.flags,
            previous: draft.previous,
            obsolete: draft.obsolete,
        });
        Ok(())
    }

    fn finish(mut self) -> CodecResult<(Option<Header>, Vec<Entry>)> {
        self.end_entry()?;
        Ok((self.header, self.entries))
    }
}

fn parse_quoted(line_no: usize, text: &str) -> CodecResult<String> {
    let text = text.trim();
    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .ok_or_else(|| {
            CodecError::syntax(line_no, format!("expected a quoted string, found {text:?}"))
        })?;
    unescape(line_no, inner)
}

fn unescape(line_no: usize, text: &str) -> CodecResult<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let next = chars
                    .next()
                    .ok_or_else(|| CodecError::syntax(line_no, "dangling backslash"))?;
                match next {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    '"' => out.push('"'),
                    '\\' => out.push('\\'),
                    'a' => out.push('\u{07}'),
                    'b' => out.push('\u{08}'),
                    'f' => out.push('\u{0c}'),
                    'v' => out.push('\u{0b}'),
                    d if d.is_digit(8) => {
                        let mut value = d.to_digit(8).unwrap_or(0);
                        for _ in 0..2 {
                            match chars.peek().and_then(|p| p.to_digit(8)) {
                                Some(digit) => {
                                    value = value * 8 + digit;
                                    chars.next();
                                }
                                None => break,
                            }
                        }
                        let decoded = char::from_u32(value).ok_or(CodecError::InvalidEscape {
                            line: line_no,
                            sequence: d,
                        })?;
                        out.push(decoded);
                    }
                    other => {
                        return Err(CodecError::InvalidEscape {
                            line: line_no,
                            sequence: other,
                        })
                    }
                }
            }
            '"' => return Err(CodecError::syntax(line_no, "unescaped quote inside string")),
            c => out.push(c),
        }
    }

    Ok(out)
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

fn write_header(out: &mut String, header: &Header) {
    write_comments(out, &header.translator_comments);
    write_source_comments(out, &header.extracted_comments, &header.references);
    write_flags(out, &header.flags);
    for previous in &header.previous {
        out.push_str(&format!("#| {previous}\n"));
    }
    out.push_str("msgid \"\"\n");
    write_string(out, "", "msgstr", &header.msgstr, true);
}

fn write_entry(out: &mut String, entry: &Entry) {
    write_comments(out, &entry.translator_comments);
    write_source_comments(out, &entry.extracted_comments, &entry.references);

    let mut flags = entry.flags.clone();
    if entry.is_conflict() && !entry.is_fuzzy() {
        flags.insert(0, FUZZY_FLAG.to_string());
    }
    write_flags(out, &flags);

    let prefix = if entry.obsolete { "#~ " } else { "" };
    for previous in &entry.previous {
        if entry.obsolete {
            out.push_str(&format!("#~| {previous}\n"));
        } else {
            out.push_str(&format!("#| {previous}\n"));
        }
    }

    if let Some(context) = &entry.key.context {
        write_string(out, prefix, "msgctxt", context, false);
    }
    write_string(out, prefix, "msgid", &entry.key.msgid, false);

    let forms = entry.forms();
    match &entry.msgid_plural {
        Some(plural) => {
            write_string(out, prefix, "msgid_plural", plural, false);
            if forms.is_empty() {
                write_string(out, prefix, "msgstr[0]", "", false);
            }
            for (index, form) in forms.iter().enumerate() {
                write_string(out, prefix, &format!("msgstr[{index}]"), form, false);
            }
        }
        None => {
            let form = forms.first().map(String::as_str).unwrap_or("");
            write_string(out, prefix, "msgstr", form, false);
        }
    }
}

fn write_comments(out: &mut String, comments: &[String]) {
    for comment in comments {
        if comment.is_empty() {
            out.push_str("#\n");
        } else {
            out.push_str(&format!("# {comment}\n"));
        }
    }
}

fn write_source_comments(out: &mut String, extracted: &[String], references: &[String]) {
    for comment in extracted {
        out.push_str(&format!("#. {comment}\n"));
    }
    if !references.is_empty() {
        out.push_str(&format!("#: {}\n", references.join(" ")));
    }
}

fn write_flags(out: &mut String, flags: &[String]) {
    if !flags.is_empty() {
        out.push_str(&format!("#, {}\n", flags.join(", ")));
    }
}

fn write_string(out: &mut String, prefix: &str, keyword: &str, value: &str, block: bool) {
    let pieces: Vec<&str> = value.split_inclusive('\n').collect();
    if pieces.len() > 1 || (block && !value.is_empty()) {
        out.push_str(&format!("{prefix}{keyword} \"\"\n"));
        for piece in pieces {
            out.push_str(&format!("{prefix}\"{}\"\n", escape(piece)));
        }
    } else {
        out.push_str(&format!("{prefix}{keyword} \"{}\"\n", escape(value)));
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\u{0b}' => out.push_str("\\v"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Alternative, CONFLICT_DELIMITER};

    const SAMPLE: &str = r#"# German translation.
#, fuzzy
msgid ""
msgstr ""
"Project-Id-Version: demo 1.0\n"
"Content-Type: text/plain; charset=UTF-8\n"

#. Shown on the start screen
#: src/main.c:10 src/main.c:20
msgid "greeting"
msgstr "Hallo"

#, c-format
msgctxt "menu"
msgid "Open %s"
msgstr "%s öffnen"

msgid "file"
msgid_plural "files"
msgstr[0] "Datei"
msgstr[1] "Dateien"

msgid "multi"
msgstr ""
"line one\n"
"line \"two\"\n"

#~ msgid "gone"
#~ msgstr "weg"
"#;

    fn parse(text: &str) -> Catalog {
        PoCodec.parse(text, "local").unwrap()
    }

    #[test]
    fn parses_header() {
        let catalog = parse(SAMPLE);
        let header = catalog.header();
        assert_eq!(header.translator_comments, vec!["German translation."]);
        assert_eq!(header.flags, vec!["fuzzy"]);
        assert_eq!(header.field("Project-Id-Version"), Some("demo 1.0"));
        assert_eq!(catalog.label(), "local");
    }

    #[test]
    fn parses_entries_in_order() {
        let catalog = parse(SAMPLE);
        let ids: Vec<&str> = catalog.keys().map(|k| k.msgid.as_str()).collect();
        assert_eq!(ids, vec!["greeting", "Open %s", "file", "multi", "gone"]);
    }

    #[test]
    fn parses_comments_and_references() {
        let catalog = parse(SAMPLE);
        let greeting = catalog.get(&EntryKey::new("greeting")).unwrap();
        assert_eq!(greeting.extracted_comments, vec!["Shown on the start screen"]);
        assert_eq!(greeting.references, vec!["src/main.c:10", "src/main.c:20"]);
        assert_eq!(greeting.forms(), vec!["Hallo"]);
    }

    #[test]
    fn parses_context_and_flags() {
        let catalog = parse(SAMPLE);
        let open = catalog
            .get(&EntryKey::with_context("menu", "Open %s"))
            .unwrap();
        assert_eq!(open.flags, vec!["c-format"]);
        assert_eq!(open.forms(), vec!["%s öffnen"]);
    }

    #[test]
    fn parses_plural_forms() {
        let catalog = parse(SAMPLE);
        let file = catalog.get(&EntryKey::new("file")).unwrap();
        assert_eq!(file.msgid_plural.as_deref(), Some("files"));
        assert_eq!(file.forms(), vec!["Datei", "Dateien"]);
    }

    #[test]
    fn parses_multiline_strings_and_escapes() {
        let catalog = parse(SAMPLE);
        let multi = catalog.get(&EntryKey::new("multi")).unwrap();
        assert_eq!(multi.forms(), vec!["line one\nline \"two\"\n"]);
    }

    #[test]
    fn parses_obsolete_entries() {
        let catalog = parse(SAMPLE);
        let gone = catalog.get(&EntryKey::new("gone")).unwrap();
        assert!(gone.is_obsolete());
        assert_eq!(gone.forms(), vec!["weg"]);
    }

    #[test]
    fn obsolete_previous_lines() {
        let text = "#~| msgid \"old\"\n#~ msgid \"new\"\n#~ msgstr \"neu\"\n";
        let catalog = parse(text);
        let entry = &catalog.entries()[0];
        assert!(entry.obsolete);
        assert_eq!(entry.previous, vec!["msgid \"old\""]);
    }

    #[test]
    fn entries_without_blank_separator() {
        let text = "msgid \"a\"\nmsgstr \"1\"\nmsgid \"b\"\nmsgstr \"2\"\n";
        let catalog = parse(text);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn missing_header_yields_empty_header() {
        let catalog = parse("msgid \"a\"\nmsgstr \"b\"\n");
        assert!(catalog.header().is_empty());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn accepts_crlf_and_bom() {
        let text = "\u{feff}msgid \"a\"\r\nmsgstr \"b\"\r\n";
        let catalog = parse(text);
        assert_eq!(catalog.entries()[0].forms(), vec!["b"]);
    }

    #[test]
    fn octal_escape() {
        let catalog = parse("msgid \"a\"\nmsgstr \"\\101\\12\"\n");
        assert_eq!(catalog.entries()[0].forms(), vec!["A\n"]);
    }

    #[test]
    fn rejects_unknown_keyword() {
        let err = PoCodec.parse("msgid \"a\"\nmsgfoo \"b\"\n", "x").unwrap_err();
        assert_eq!(err.line(), 2);
        assert!(matches!(err, CodecError::Syntax { .. }));
    }

    #[test]
    fn rejects_missing_msgstr() {
        let err = PoCodec.parse("\nmsgid \"a\"\n\nmsgid \"b\"\nmsgstr \"\"\n", "x").unwrap_err();
        assert_eq!(
            err,
            CodecError::MissingMsgstr {
                line: 2,
                msgid: "a".into()
            }
        );
    }

    #[test]
    fn rejects_invalid_escape() {
        let err = PoCodec.parse("msgid \"a\\q\"\nmsgstr \"\"\n", "x").unwrap_err();
        assert_eq!(err, CodecError::InvalidEscape { line: 1, sequence: 'q' });
    }

    #[test]
    fn rejects_unterminated_string() {
        let err = PoCodec.parse("msgid \"a\nmsgstr \"\"\n", "x").unwrap_err();
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn rejects_out_of_range_plural_index() {
        for index in ["18446744073709551615", "99999999999", "2"] {
            let text = format!(
                "msgid \"a\"\nmsgid_plural \"b\"\nmsgstr[0] \"x\"\nmsgstr[{index}] \"y\"\n"
            );
            let err = PoCodec.parse(&text, "x").unwrap_err();
            assert_eq!(err.line(), 4, "index {index}");
            assert!(err.to_string().contains("invalid plural index"));
        }
    }

    #[test]
    fn rejects_plural_index_that_does_not_fit_usize() {
        let text = "msgid \"a\"\nmsgid_plural \"b\"\nmsgstr[99999999999999999999999] \"x\"\n";
        let err = PoCodec.parse(text, "x").unwrap_err();
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn accepts_plural_forms_in_order() {
        let text = "msgid \"a\"\nmsgid_plural \"b\"\nmsgstr[0] \"x\"\nmsgstr[1] \"y\"\nmsgstr[2] \"z\"\n";
        let catalog = PoCodec.parse(text, "x").unwrap();
        assert_eq!(catalog.entries()[0].forms(), vec!["x", "y", "z"]);
    }

    #[test]
    fn header_keeps_every_comment_kind() {
        let text = concat!(
            "# translators\n",
            "#. generated\n",
            "#: po/header.c:1\n",
            "#, fuzzy\n",
            "#| msgid \"\"\n",
            "msgid \"\"\n",
            "msgstr \"Language: de\\n\"\n",
        );
        let catalog = parse(text);
        let header = catalog.header();
        assert_eq!(header.translator_comments, vec!["translators"]);
        assert_eq!(header.extracted_comments, vec!["generated"]);
        assert_eq!(header.references, vec!["po/header.c:1"]);
        assert_eq!(header.flags, vec!["fuzzy"]);
        assert_eq!(header.previous, vec!["msgid \"\""]);

        let again = parse(&PoCodec.serialize(&catalog));
        assert_eq!(again.header(), header);
    }

    #[test]
    fn rejects_duplicate_header() {
        let text = "msgid \"\"\nmsgstr \"A: b\\n\"\n\nmsgid \"\"\nmsgstr \"\"\n";
        let err = PoCodec.parse(text, "x").unwrap_err();
        assert_eq!(err, CodecError::DuplicateHeader { line: 4 });
    }

    #[test]
    fn rejects_dangling_continuation() {
        let err = PoCodec.parse("\"orphan\"\n", "x").unwrap_err();
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn serialize_then_parse_is_lossless() {
        let first = parse(SAMPLE);
        let text = PoCodec.serialize(&first);
        let second = parse(&text);
        assert_eq!(first, second);
    }

    // -----------------------------------------------------------------------
    // generated catalogs
    // -----------------------------------------------------------------------

    use proptest::prelude::*;

    fn arb_text() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 \"\\\\\n\täö#%]{0,12}"
    }

    fn arb_words(pattern: &'static str) -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec(pattern, 0..3)
    }

    fn arb_entry() -> impl Strategy<Value = Entry> {
        let plural = proptest::option::of((
            "[a-z]{1,6}",
            proptest::collection::vec(arb_text(), 1..4),
        ));
        (
            (proptest::option::of("[a-z]{1,5}"), "[a-z][a-z %]{0,8}", plural, arb_text()),
            (
                arb_words("[a-z]{1,8}"),
                arb_words("[a-z]{1,8}"),
                arb_words("[a-z]{1,5}\\.c:[0-9]{1,3}"),
                arb_words("[a-z][a-z-]{0,8}"),
                arb_words("msgid \"[a-z]{1,5}\""),
                any::<bool>(),
            ),
        )
            .prop_map(
                |(
                    (context, msgid, plural, singular),
                    (translator, extracted, references, flags, previous, obsolete),
                )| {
                    let (msgid_plural, forms) = match plural {
                        Some((id, forms)) => (Some(id), forms),
                        None => (None, vec![singular]),
                    };
                    Entry {
                        key: EntryKey { context, msgid },
                        msgid_plural,
                        value: EntryValue::Translated(forms),
                        translator_comments: translator,
                        extracted_comments: extracted,
                        references,
                        flags,
                        previous,
                        obsolete,
                    }
                },
            )
    }

    fn arb_catalog() -> impl Strategy<Value = Catalog> {
        let header = prop_oneof![
            Just(Header::empty()),
            Just(Header::from_fields([
                ("Language", "de"),
                ("Content-Type", "text/plain; charset=UTF-8"),
            ])),
        ];
        (header, proptest::collection::vec(arb_entry(), 0..8))
            .prop_map(|(header, entries)| Catalog::from_parts("local", header, entries))
    }

    proptest! {
        #[test]
        fn serialize_then_parse_is_lossless_for_generated_catalogs(catalog in arb_catalog()) {
            let text = PoCodec.serialize(&catalog);
            let parsed = PoCodec.parse(&text, "local").unwrap();
            prop_assert_eq!(parsed, catalog);
        }
    }

    #[test]
    fn serialize_writes_header_as_block() {
        let catalog = Catalog::from_parts(
            "x",
            Header::from_fields([("Language", "de")]),
            vec![Entry::new("a", "b")],
        );
        let text = PoCodec.serialize(&catalog);
        assert_eq!(
            text,
            "msgid \"\"\nmsgstr \"\"\n\"Language: de\\n\"\n\nmsgid \"a\"\nmsgstr \"b\"\n"
        );
    }

    #[test]
    fn serialize_obsolete_entry() {
        let catalog = Catalog::from_entries("x", vec![Entry::new("gone", "weg").into_obsolete()]);
        let text = PoCodec.serialize(&catalog);
        assert!(text.contains("#~ msgid \"gone\"\n#~ msgstr \"weg\"\n"));
    }

    #[test]
    fn serialize_conflict_marks_fuzzy_and_renders_delimiters() {
        let mut entry = Entry::new("farewell", "");
        entry.value = EntryValue::Conflict(vec![
            Alternative {
                label: "other".into(),
                forms: vec!["See ya".into()],
            },
            Alternative {
                label: "local".into(),
                forms: vec!["Goodbye".into()],
            },
        ]);
        let catalog = Catalog::from_entries("merged", vec![entry]);
        let text = PoCodec.serialize(&catalog);

        assert!(text.contains("#, fuzzy\n"));
        assert!(text.contains(CONFLICT_DELIMITER));
        assert!(text.contains("\"#-#-#-#-#  other  #-#-#-#-#\\n\"\n\"See ya\\n\"\n"));

        let reparsed = parse(&text);
        let forms = reparsed.entries()[0].forms();
        assert!(forms[0].contains("Goodbye"));
        assert!(reparsed.entries()[0].is_fuzzy());
    }

    #[test]
    fn escape_roundtrip_of_control_characters() {
        let entry = Entry::new("tab", "a\tb\\c\r");
        let catalog = Catalog::from_entries("x", vec![entry.clone()]);
        let back = parse(&PoCodec.serialize(&catalog));
        assert_eq!(back.entries()[0].forms(), entry.forms());
    }
}
