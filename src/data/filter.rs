use super::model::{Measure, RawRow, ValidRecord, YEAR_COLUMN};

// ---------------------------------------------------------------------------
// Field specs: which columns a scene parses and how it filters on them
// ---------------------------------------------------------------------------

/// How a cell's text is turned into a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseKind {
    /// Leading-integer parse: `"2001abc"` → 2001, `"abc"` → invalid.
    Integer,
    Float,
}

/// Row retention rule attached to a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Retain {
    /// Keep the row whether or not the value parses.
    Optional,
    /// Drop the row unless the value parses to a finite number.
    Required,
    /// Drop the row unless the value is finite and strictly below the ceiling.
    Below(f64),
}

/// One measurement column to parse for a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Source column header.
    pub column: String,
    /// Where the parsed value is stored on the record.
    pub target: Measure,
    pub kind: ParseKind,
    pub retain: Retain,
}

impl FieldSpec {
    /// A float field read from the measure's standard header.
    pub fn float(target: Measure, retain: Retain) -> Self {
        Self {
            column: target.header().to_string(),
            target,
            kind: ParseKind::Float,
            retain,
        }
    }
}

/// Result of [`parse_and_filter`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filtered {
    pub records: Vec<ValidRecord>,
    /// Rows discarded by the year check or a retention rule.
    pub dropped: usize,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse the leading integer of `s`, ignoring surrounding text after the digits.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let sign_len = usize::from(matches!(bytes.first(), Some(b'+') | Some(b'-')));
    let digits = bytes[sign_len..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    s[..sign_len + digits].parse().ok()
}

/// Parse the longest leading decimal number of `s` (`"12mm"` → 12,
/// `"5.0 °C"` → 5). Text without a leading number and non-finite results
/// yield `None`.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        bytes[start.min(bytes.len())..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+') | Some(b'-')));
    let int_digits = digits_from(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+') | Some(b'-')));
        let exp_digits = digits_from(end + 1 + sign);
        if exp_digits > 0 {
            end += 1 + sign + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_cell(raw: Option<&String>, kind: ParseKind) -> Option<f64> {
    let text = raw.map(|s| s.as_str()).filter(|s| !s.is_empty())?;
    match kind {
        ParseKind::Float => parse_float_prefix(text),
        ParseKind::Integer => parse_int_prefix(text).map(|v| v as f64),
    }
}

fn passes(value: Option<f64>, retain: Retain) -> bool {
    match (retain, value) {
        (Retain::Optional, _) => true,
        (Retain::Required, v) => v.is_some(),
        (Retain::Below(ceiling), Some(v)) => v < ceiling,
        (Retain::Below(_), None) => false,
    }
}

/// Parse raw rows into [`ValidRecord`]s, discarding rows whose year is not
/// a valid integer or whose fields fail their retention rule.
///
/// Malformed cells never produce an error: the row is either kept with the
/// field absent (`Retain::Optional`) or dropped and counted.
pub fn parse_and_filter(rows: &[RawRow], specs: &[FieldSpec]) -> Filtered {
    let mut out = Filtered::default();

    'rows: for row in rows {
        let Some(year) = row
            .get(YEAR_COLUMN)
            .and_then(|s| parse_int_prefix(s))
            .and_then(|y| i32::try_from(y).ok())
        else {
            out.dropped += 1;
            continue;
        };

        let mut record = ValidRecord::new(year);
        for spec in specs {
            let value = parse_cell(row.get(&spec.column), spec.kind);
            if !passes(value, spec.retain) {
                out.dropped += 1;
                continue 'rows;
            }
            record.values.insert(spec.target, value);
        }
        out.records.push(record);
    }

    out
}
