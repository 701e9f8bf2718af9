use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::ConfigError;
use crate::template::OperationKind;

// Parses the workload configuration artifact.
//
// The artifact is plain UTF-8 text with the following format:
//
//   <PercInsert> <PercModify> <PercSearch>
//
// followed by an unknown number of template lines:
//
//   <K> <share> <attr1> ... <attrN>
//
// where K tags the kind of the operation: I(nsert), M(odify) or S(earch).
// Blank lines are ignored. There is no comment syntax, no quoting and
// no escaping.

/// Declared share of the total workload for each operation kind.
/// The three values must sum to exactly 100.0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KindPercentages {
    pub insert: f64,
    pub modify: f64,
    pub search: f64,
}

impl KindPercentages {
    pub fn of(&self, kind: OperationKind) -> f64 {
        match kind {
            OperationKind::Insert => self.insert,
            OperationKind::Modify => self.modify,
            OperationKind::Search => self.search,
        }
    }
}

/// A single template declaration, still carrying its raw share.
/// Shares are turned into cumulative roofs when the plan is built,
/// so declaration order matters and is preserved.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateRecord {
    pub kind: OperationKind,
    pub share: f64,
    pub attributes: Vec<String>,
}

/// The parsed form of the configuration artifact: the header percentages
/// and the template records in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkloadConfig {
    pub percentages: KindPercentages,
    pub records: Vec<TemplateRecord>,
}

impl WorkloadConfig {
    /// Parses the ordered lines of a configuration artifact. Any text
    /// source works: a file, an embedded string, a network fetch.
    /// Blank lines are skipped; everything else must parse, and there
    /// must be a header plus at least one template line.
    pub fn parse<I, S>(lines: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lines = lines
            .into_iter()
            .filter(|line| !line.as_ref().trim().is_empty());

        let header = lines.next().ok_or(ConfigError::InsufficientInput)?;
        let percentages = parse_header(header.as_ref())?;

        let records = lines
            .map(|line| parse_template_line(line.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        if records.is_empty() {
            return Err(ConfigError::InsufficientInput);
        }

        Ok(Self {
            percentages,
            records,
        })
    }
}

fn parse_header(line: &str) -> Result<KindPercentages, ConfigError> {
    let malformed = || ConfigError::MalformedHeader {
        line: line.to_owned(),
    };

    let mut fields = line
        .split_whitespace()
        .map(|token| token.parse::<f64>().map_err(|_| malformed()));
    let (insert, modify, search) =
        match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(insert), Some(modify), Some(search), None) => (insert?, modify?, search?),
            _ => return Err(malformed()),
        };

    let sum = insert + modify + search;
    if sum != 100.0 {
        return Err(ConfigError::PercentageSumMismatch { sum });
    }

    Ok(KindPercentages {
        insert,
        modify,
        search,
    })
}

fn parse_template_line(line: &str) -> Result<TemplateRecord, ConfigError> {
    let tokens = line.split_whitespace().collect::<Vec<_>>();
    let (tag, share_token, attrs) = match tokens.as_slice() {
        [tag, share, attrs @ ..] if !attrs.is_empty() => (*tag, *share, attrs),
        _ => {
            return Err(ConfigError::MalformedTemplateLine {
                line: line.to_owned(),
            })
        }
    };

    // An unknown kind tag rejects the whole line.
    let kind = tag
        .parse::<OperationKind>()
        .map_err(|_| ConfigError::MalformedTemplateLine {
            line: line.to_owned(),
        })?;
    let share = share_token
        .parse::<f64>()
        .map_err(|_| ConfigError::UnparseableShare {
            token: share_token.to_owned(),
            line: line.to_owned(),
        })?;

    Ok(TemplateRecord {
        kind,
        share,
        attributes: attrs.iter().map(|s| s.to_string()).collect(),
    })
}

/// Reads the configuration artifact from a file and yields its ordered
/// non-blank lines. This is the file flavor of the line source consumed
/// by [`WorkloadConfig::parse`], used by the CLI.
pub fn read_config_lines(path: impl AsRef<Path>) -> Result<Vec<String>, ConfigError> {
    let file = File::open(path.as_ref())?;

    let mut lines = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        lines.push(line);
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let input = "50 30 20\nI 60 name\nI 40 email\nM 100 name age\nS 100 name";
        let config = WorkloadConfig::parse(input.lines()).unwrap();

        assert_eq!(
            config.percentages,
            KindPercentages {
                insert: 50.0,
                modify: 30.0,
                search: 20.0,
            }
        );
        assert_eq!(config.records.len(), 4);
        assert_eq!(
            config.records[2],
            TemplateRecord {
                kind: OperationKind::Modify,
                share: 100.0,
                attributes: vec!["name".to_owned(), "age".to_owned()],
            }
        );
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let input = "\n100 0 0\n\n   \nI 100 a\n\n";
        let config = WorkloadConfig::parse(input.lines()).unwrap();
        assert_eq!(config.records.len(), 1);
        assert_eq!(config.records[0].kind, OperationKind::Insert);
    }

    #[test]
    fn test_insufficient_input() {
        let bads: &[&str] = &[
            "",              // Nothing at all
            "50 30 20",      // Header only
            "\n  \n\n",      // Blank lines only
            "50 30 20\n\n ", // Header followed by blanks only
        ];

        for input in bads {
            println!("Parsing: {:?}", input);
            let err = WorkloadConfig::parse(input.lines()).unwrap_err();
            assert!(matches!(err, ConfigError::InsufficientInput));
        }
    }

    #[test]
    fn test_malformed_header() {
        let bads: &[&str] = &[
            "50 30",       // Too few fields
            "50 30 10 10", // Too many fields
            "50 30 x",     // Unparseable field
            "a b c",
        ];

        for header in bads {
            println!("Parsing: {}", header);
            let input = format!("{header}\nI 100 a");
            let err = WorkloadConfig::parse(input.lines()).unwrap_err();
            assert!(matches!(err, ConfigError::MalformedHeader { .. }));
        }
    }

    #[test]
    fn test_percentage_sum_mismatch() {
        let err = WorkloadConfig::parse("50 50 1\nI 100 a".lines()).unwrap_err();
        match err {
            ConfigError::PercentageSumMismatch { sum } => assert_eq!(sum, 101.0),
            other => panic!("Unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_template_line() {
        let bads: &[&str] = &[
            "I 60",       // No attributes
            "I",          // Tag only
            "X 60 name",  // Unknown kind tag
            "IM 60 name", // Tag must be a single letter
        ];

        for line in bads {
            println!("Parsing: {}", line);
            let input = format!("100 0 0\n{line}");
            let err = WorkloadConfig::parse(input.lines()).unwrap_err();
            assert!(matches!(err, ConfigError::MalformedTemplateLine { .. }));
        }
    }

    #[test]
    fn test_unparseable_share() {
        let err = WorkloadConfig::parse("100 0 0\nI sixty name".lines()).unwrap_err();
        match err {
            ConfigError::UnparseableShare { token, .. } => assert_eq!(token, "sixty"),
            other => panic!("Unexpected error: {other}"),
        }
    }
}
