//! Chunk types with source tracking for citations

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Guideline documents that make up the corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceDocument {
    /// Guidance Note on Operational Risk Management and Operational Resilience
    OperationalRiskGuidance,
    /// Guidelines on Credit Risk Management
    CreditRiskManagement,
    /// Master Circular on Basel III Capital Regulations
    BaselIiiCapitalRegulations,
    /// Guidelines on Market Risk Management
    MarketRiskManagement,
    /// Liquidity Risk Management Framework
    LiquidityRiskFramework,
    /// Master Direction on Information Technology Governance, Risk, Controls and Assurance Practices
    ItGovernanceDirection,
    /// Cyber Security Framework in Banks
    CyberSecurityFramework,
    /// Master Direction on Know Your Customer
    KycDirection,
    /// Master Directions on Fraud Risk Management
    FraudRiskManagement,
    /// Directions on Managing Risks in Outsourcing of Financial Services
    OutsourcingDirections,
}

impl SourceDocument {
    /// Every document in the corpus, in catalogue order
    pub const ALL: [SourceDocument; 10] = [
        Self::OperationalRiskGuidance,
        Self::CreditRiskManagement,
        Self::BaselIiiCapitalRegulations,
        Self::MarketRiskManagement,
        Self::LiquidityRiskFramework,
        Self::ItGovernanceDirection,
        Self::CyberSecurityFramework,
        Self::KycDirection,
        Self::FraudRiskManagement,
        Self::OutsourcingDirections,
    ];

    /// Human-readable document title
    pub fn title(&self) -> &'static str {
        match self {
            Self::OperationalRiskGuidance => {
                "Guidance Note on Operational Risk Management and Operational Resilience"
            }
            Self::CreditRiskManagement => "Guidelines on Credit Risk Management",
            Self::BaselIiiCapitalRegulations => "Master Circular - Basel III Capital Regulations",
            Self::MarketRiskManagement => "Guidelines on Market Risk Management",
            Self::LiquidityRiskFramework => "Liquidity Risk Management Framework",
            Self::ItGovernanceDirection => {
                "Master Direction on IT Governance, Risk, Controls and Assurance Practices"
            }
            Self::CyberSecurityFramework => "Cyber Security Framework in Banks",
            Self::KycDirection => "Master Direction - Know Your Customer (KYC)",
            Self::FraudRiskManagement => "Master Directions on Fraud Risk Management",
            Self::OutsourcingDirections => {
                "Directions on Managing Risks in Outsourcing of Financial Services"
            }
        }
    }
}

impl fmt::Display for SourceDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Regulatory instrument type of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    MasterDirection,
    MasterCircular,
    Circular,
    GuidanceNote,
    Framework,
    Faq,
}

impl DocumentType {
    /// Parse the snake_case wire name (as used in search filters)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "master_direction" => Some(Self::MasterDirection),
            "master_circular" => Some(Self::MasterCircular),
            "circular" => Some(Self::Circular),
            "guidance_note" => Some(Self::GuidanceNote),
            "framework" => Some(Self::Framework),
            "faq" => Some(Self::Faq),
            _ => None,
        }
    }

    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MasterDirection => "Master Direction",
            Self::MasterCircular => "Master Circular",
            Self::Circular => "Circular",
            Self::GuidanceNote => "Guidance Note",
            Self::Framework => "Framework",
            Self::Faq => "FAQ",
        }
    }
}

/// An immutable segment of guideline text, the unit of retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text
    pub text: String,
    /// Document the chunk was cut from
    pub source_document: SourceDocument,
    /// Section heading the chunk belongs to
    pub section_title: String,
    /// Free-form topic tags (e.g. "operational risk", "board oversight")
    #[serde(default)]
    pub topic_tags: BTreeSet<String>,
    /// Instrument type of the source document
    pub document_type: DocumentType,
}

impl Chunk {
    /// Create a chunk without topic tags
    pub fn new(
        text: impl Into<String>,
        source_document: SourceDocument,
        section_title: impl Into<String>,
        document_type: DocumentType,
    ) -> Self {
        Self {
            text: text.into(),
            source_document,
            section_title: section_title.into(),
            topic_tags: BTreeSet::new(),
            document_type,
        }
    }

    /// Attach topic tags (normalized to lower case)
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.topic_tags = tags
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        self
    }

    /// Whether the chunk carries the given tag (case-insensitive)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.topic_tags.contains(&tag.trim().to_lowercase())
    }
}
