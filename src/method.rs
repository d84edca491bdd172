//! The method registry: every remote operation the service exposes and
//! the field contract each one is transmitted with.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::{Error, Result};

/// Wire-level field names shared across the registry.
pub mod fields {
    /// A domain under management, e.g. `www.example.com`.
    pub const DOMAIN: &str = "domain";
    /// A tracked keyword phrase.
    pub const KEYWORD: &str = "keyword";
    /// Inclusive range start, `YYYY-MM-DD`.
    pub const START_DATE: &str = "start_date";
    /// Inclusive range end, `YYYY-MM-DD`.
    pub const END_DATE: &str = "end_date";
    /// Engine selector: `all` or a specific engine name.
    pub const ENGINE: &str = "engine";
    /// Numeric engine identifiers, transmitted one element at a time.
    pub const ENGINE_ID: &str = "engine_id";
    /// Link tag filter.
    pub const TAG: &str = "tag";
    /// JSON-encoded array of link records.
    pub const LINK: &str = "link";
}

/// One named capability of the service.
///
/// The wire name is the snake_case form of the variant:
/// `Operation::RankMaxWeek` travels as `rank_max_week` in the `method`
/// query parameter.
///
/// ## Examples
///
/// ```rust
/// use raventools::Operation;
///
/// let op: Operation = "rank".parse().unwrap();
/// assert_eq!(op, Operation::Rank);
/// assert_eq!(op.wire_name(), "rank");
/// assert_eq!(op.descriptor().required.len(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    /// Account profile details and keyword usage.
    ProfileInfo,
    /// Domains registered on the profile.
    Domains,
    /// Register a domain for tracking.
    AddDomain,
    /// Remove a domain from the profile.
    RemoveDomain,
    /// Catalog of engines available for rank tracking.
    Engines,
    /// Tracking details for one domain.
    DomainInfo,
    /// Rank history for one keyword over a date range.
    Rank,
    /// Rank history for every tracked keyword.
    RankAll,
    /// The best-ranking week for a keyword.
    RankMaxWeek,
    /// Competitor domains tracked against a domain.
    Competitors,
    /// Keywords tracked on a domain.
    Keywords,
    /// Keywords tracked on a domain, with their tags.
    KeywordsTags,
    /// Start tracking a keyword.
    AddKeyword,
    /// Stop tracking a keyword.
    RemoveKeyword,
    /// Links recorded for a domain.
    GetLinks,
    /// Create link records.
    AddLinks,
    /// Update existing link records.
    UpdateLinks,
    /// Delete link records.
    DeleteLinks,
    /// Catalog of website types used by link records.
    GetWebsiteTypes,
    /// Catalog of link types used by link records.
    GetLinkTypes,
}

/// The static field contract for one operation.
///
/// Required fields must be present and non-empty before a request is
/// serialized; optional fields are transmitted only when present and
/// non-empty. Order within each list is the order fields appear in the
/// request URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    /// Fields that must be present and non-empty.
    pub required: &'static [&'static str],
    /// Fields transmitted only when supplied.
    pub optional: &'static [&'static str],
}

impl Operation {
    /// Look up an operation by its wire name.
    pub fn resolve(name: &str) -> Result<Operation> {
        name.parse().map_err(|_| Error::UnknownOperation {
            operation: name.to_string(),
        })
    }

    /// The snake_case name transmitted as the `method` parameter.
    pub fn wire_name(self) -> &'static str {
        self.into()
    }

    /// The field contract for this operation.
    ///
    /// This table is authoritative: fields it does not list are never
    /// transmitted for the operation, whatever the caller supplied.
    pub fn descriptor(self) -> Descriptor {
        use fields::{DOMAIN, END_DATE, ENGINE, ENGINE_ID, KEYWORD, LINK, START_DATE, TAG};

        match self {
            Operation::ProfileInfo
            | Operation::Domains
            | Operation::Engines
            | Operation::GetWebsiteTypes
            | Operation::GetLinkTypes => Descriptor {
                required: &[],
                optional: &[],
            },
            Operation::AddDomain => Descriptor {
                required: &[DOMAIN, ENGINE_ID],
                optional: &[],
            },
            Operation::RemoveDomain
            | Operation::DomainInfo
            | Operation::Competitors
            | Operation::Keywords
            | Operation::KeywordsTags => Descriptor {
                required: &[DOMAIN],
                optional: &[],
            },
            Operation::Rank => Descriptor {
                required: &[DOMAIN, KEYWORD, START_DATE, END_DATE, ENGINE],
                optional: &[],
            },
            // The service defaults the range end when it is absent.
            Operation::RankAll => Descriptor {
                required: &[DOMAIN, START_DATE],
                optional: &[END_DATE],
            },
            Operation::RankMaxWeek => Descriptor {
                required: &[DOMAIN],
                optional: &[KEYWORD],
            },
            // The service lists keyword before domain for these two.
            Operation::AddKeyword | Operation::RemoveKeyword => Descriptor {
                required: &[KEYWORD, DOMAIN],
                optional: &[],
            },
            Operation::GetLinks => Descriptor {
                required: &[DOMAIN],
                optional: &[TAG],
            },
            Operation::AddLinks | Operation::UpdateLinks | Operation::DeleteLinks => Descriptor {
                required: &[DOMAIN, LINK],
                optional: &[],
            },
        }
    }
}
