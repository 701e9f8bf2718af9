use rand::Rng;
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString};
use tracing::debug;

use crate::config::{KindPercentages, WorkloadConfig};
use crate::error::{ConfigError, LookupError};

/// One of the three operation categories a generated workload operation
/// can belong to. Template lines tag their kind with the one-letter forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, EnumString)]
pub enum OperationKind {
    #[strum(serialize = "I")]
    Insert,
    #[strum(serialize = "M")]
    Modify,
    #[strum(serialize = "S")]
    Search,
}

impl OperationKind {
    fn slot(self) -> usize {
        match self {
            OperationKind::Insert => 0,
            OperationKind::Modify => 1,
            OperationKind::Search => 2,
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OperationKind::Insert => "insert",
            OperationKind::Modify => "modify",
            OperationKind::Search => "search",
        };
        write!(f, "{}", s)
    }
}

/// A query shape the generator can pick for an operation, parametrized by
/// a percentage roof.
///
/// `roof` is not the template's own share: it is the running total of all
/// same-kind shares up to and including this one, in declaration order.
/// Given same-kind templates T1, T2, T3, the interval T1 is responsible
/// for is (0, T1.roof], for T2 it is (T1.roof, T2.roof] and for T3 it is
/// (T2.roof, T3.roof]. The last template of a used kind always has a roof
/// of exactly 100.0.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    roof: f64,
    attributes: Vec<String>,
}

impl Template {
    pub fn roof(&self) -> f64 {
        self.roof
    }

    /// Attribute names the generator should populate when this template
    /// is chosen. May be empty only if declared so; parsing requires at
    /// least one.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }
}

/// The planning structure of the workload generator: per operation kind,
/// the templates ordered by ascending cumulative roof, plus the header
/// percentages for the outer kind selection.
///
/// Built once from a [`WorkloadConfig`] and immutable afterwards, so it
/// can be shared between any number of concurrent readers.
#[derive(Debug)]
pub struct TemplateIndex {
    percentages: KindPercentages,
    buckets: [Vec<Template>; 3],
}

impl TemplateIndex {
    /// Consumes the parsed records in declaration order, converting each
    /// record's share into a cumulative roof tracked independently per
    /// kind, and validates that every used kind partitions (0, 100]
    /// exactly.
    pub fn build(config: WorkloadConfig) -> Result<Self, ConfigError> {
        let WorkloadConfig {
            percentages,
            records,
        } = config;

        let mut buckets: [Vec<Template>; 3] = Default::default();
        let mut totals = [0.0f64; 3];

        for record in records {
            let slot = record.kind.slot();
            // The previous roof of this kind is the base of the interval
            // owned by this template.
            let roof = totals[slot] + record.share;
            buckets[slot].push(Template {
                roof,
                attributes: record.attributes,
            });
            totals[slot] = roof;
        }

        // Roofs are already ascending when every share is positive; the
        // stable sort settles the remaining cases. A zero-share template
        // computes the same roof as its predecessor and keeps declaration
        // order, so lookup resolves the predecessor and the zero-share
        // template owns an empty interval.
        for bucket in &mut buckets {
            bucket.sort_by(|a, b| a.roof.total_cmp(&b.roof));
        }

        for kind in OperationKind::iter() {
            let reached = totals[kind.slot()];
            let unused = percentages.of(kind) == 0.0 && reached == 0.0;
            if reached != 100.0 && !unused {
                return Err(ConfigError::PartitionInvariantViolation { kind, reached });
            }
            debug!(
                "{} bucket ready: {} templates, roofs reach {}",
                kind,
                buckets[kind.slot()].len(),
                reached
            );
        }

        Ok(Self {
            percentages,
            buckets,
        })
    }

    /// Returns the template owning `draw` within `kind`: the first
    /// template in ascending-roof order with `roof >= draw`. `draw` is
    /// expected to be a uniform value in (0, 100].
    pub fn lookup(&self, kind: OperationKind, draw: f64) -> Result<&Template, LookupError> {
        let bucket = &self.buckets[kind.slot()];
        if bucket.is_empty() {
            return Err(LookupError::NoTemplates { kind });
        }

        let idx = bucket.partition_point(|template| template.roof < draw);
        match bucket.get(idx) {
            Some(template) => Ok(template),
            None => Err(LookupError::DrawBeyondMaxRoof {
                kind,
                draw,
                max_roof: bucket[bucket.len() - 1].roof,
            }),
        }
    }

    /// Selects the kind owning `draw` using the same interval convention
    /// as [`Self::lookup`], over the header percentages in Insert,
    /// Modify, Search order.
    pub fn kind_for_draw(&self, draw: f64) -> Result<OperationKind, LookupError> {
        // A draw of 0.0 (or less) would land on a leading 0%-share kind,
        // whose roof stays at 0.0.
        if draw <= 0.0 {
            return Err(LookupError::KindDrawOutOfRange { draw });
        }

        let mut roof = 0.0;
        for kind in OperationKind::iter() {
            roof += self.percentages.of(kind);
            if draw <= roof {
                return Ok(kind);
            }
        }
        Err(LookupError::KindDrawOutOfRange { draw })
    }

    /// Draws a kind for the next operation from `rng`.
    pub fn sample_kind<R: Rng>(&self, rng: &mut R) -> Result<OperationKind, LookupError> {
        self.kind_for_draw(percentage_draw(rng))
    }

    /// Draws a template of `kind` for the next operation from `rng`.
    pub fn sample<R: Rng>(&self, kind: OperationKind, rng: &mut R) -> Result<&Template, LookupError> {
        self.lookup(kind, percentage_draw(rng))
    }

    /// The declared top-level share of each kind, for consumers that run
    /// the outer kind selection themselves.
    pub fn percentages(&self) -> &KindPercentages {
        &self.percentages
    }

    /// The templates of `kind` in ascending-roof order.
    pub fn templates(&self, kind: OperationKind) -> &[Template] {
        &self.buckets[kind.slot()]
    }

    pub fn print_plan(&self) {
        println!("******************** Workload Plan ********************");
        println!(
            "Operation mix: insert={} modify={} search={}",
            self.percentages.insert, self.percentages.modify, self.percentages.search
        );
        for kind in OperationKind::iter() {
            let bucket = &self.buckets[kind.slot()];
            println!("{} templates: {}", kind, bucket.len());
            for template in bucket {
                println!(
                    "  roof {:>6.2} -> [{}]",
                    template.roof,
                    template.attributes.join(", ")
                );
            }
        }
        println!();
    }
}

// A uniform draw in (0, 100]: `gen::<f64>()` yields [0, 1), mirrored
// around 100 it covers (0, 100].
fn percentage_draw<R: Rng>(rng: &mut R) -> f64 {
    100.0 - rng.gen::<f64>() * 100.0
}
