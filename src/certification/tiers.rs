use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Ordered certification tiers. Only the four medal tiers qualify for a
/// printed certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CertificationTier {
    NotCertified,
    Certified,
    Bronze,
    Silver,
    Gold,
    Platinum,
}

static MARKUP_TAGS: OnceLock<Regex> = OnceLock::new();

impl CertificationTier {
    pub fn label(&self) -> &'static str {
        match self {
            CertificationTier::NotCertified => "Not Certified",
            CertificationTier::Certified => "Certified",
            CertificationTier::Bronze => "Bronze",
            CertificationTier::Silver => "Silver",
            CertificationTier::Gold => "Gold",
            CertificationTier::Platinum => "Platinum",
        }
    }

    /// Parses a stored tier label. Legacy records carried presentation markup
    /// around the label (HTML fragments, icon characters); anything that is
    /// not a plain letter or space is stripped before matching. Labels that
    /// still fail to match map to NotCertified.
    pub fn from_label(label: &str) -> Self {
        let tags = MARKUP_TAGS.get_or_init(|| Regex::new(r"<[^>]*>").unwrap());
        let stripped = tags.replace_all(label, " ");
        let plain: String = stripped
            .chars()
            .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
            .collect();
        let normalized = plain.split_whitespace().collect::<Vec<_>>().join(" ");

        match normalized.to_lowercase().as_str() {
            "certified" => CertificationTier::Certified,
            "bronze" => CertificationTier::Bronze,
            "silver" => CertificationTier::Silver,
            "gold" => CertificationTier::Gold,
            "platinum" => CertificationTier::Platinum,
            _ => CertificationTier::NotCertified,
        }
    }

    pub fn qualifies_for_certificate(&self) -> bool {
        matches!(
            self,
            CertificationTier::Bronze
                | CertificationTier::Silver
                | CertificationTier::Gold
                | CertificationTier::Platinum
        )
    }
}

impl std::fmt::Display for CertificationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
pub enum TierTableError {
    #[error("tier threshold table is empty")]
    Empty,
    #[error("invalid cutoff entry '{0}', expected tier=percent")]
    Entry(String),
    #[error("unknown tier name '{0}'")]
    UnknownTier(String),
    #[error("cutoff percent {0} is outside 0..=100")]
    OutOfRange(u32),
    #[error("cutoffs must be strictly increasing in both percent and tier")]
    NotMonotonic,
}

#[derive(Debug, Clone)]
pub struct TierCutoff {
    pub min_percent: u8,
    pub tier: CertificationTier,
}

/// Threshold table mapping completion percentages to tiers. The cutoffs are
/// deployment configuration: two schemes have been observed in the field and
/// both ship as named presets.
#[derive(Debug, Clone)]
pub struct TierTable {
    cutoffs: Vec<TierCutoff>,
}

impl TierTable {
    pub fn new(cutoffs: Vec<TierCutoff>) -> Result<Self, TierTableError> {
        if cutoffs.is_empty() {
            return Err(TierTableError::Empty);
        }
        for cutoff in &cutoffs {
            if cutoff.tier == CertificationTier::NotCertified {
                return Err(TierTableError::UnknownTier(cutoff.tier.label().to_string()));
            }
        }
        let ordered = cutoffs
            .windows(2)
            .all(|pair| pair[0].min_percent < pair[1].min_percent && pair[0].tier < pair[1].tier);
        if !ordered {
            return Err(TierTableError::NotMonotonic);
        }
        Ok(Self { cutoffs })
    }

    /// The 50/60/70/80/90 scheme with an intermediate Certified tier.
    pub fn six_tier() -> Self {
        Self::preset(&[
            (50, CertificationTier::Certified),
            (60, CertificationTier::Bronze),
            (70, CertificationTier::Silver),
            (80, CertificationTier::Gold),
            (90, CertificationTier::Platinum),
        ])
    }

    /// The 40/56/72/88 scheme: medal tiers only.
    pub fn four_tier() -> Self {
        Self::preset(&[
            (40, CertificationTier::Bronze),
            (56, CertificationTier::Silver),
            (72, CertificationTier::Gold),
            (88, CertificationTier::Platinum),
        ])
    }

    fn preset(entries: &[(u8, CertificationTier)]) -> Self {
        let cutoffs = entries
            .iter()
            .map(|(min_percent, tier)| TierCutoff {
                min_percent: *min_percent,
                tier: *tier,
            })
            .collect();
        Self::new(cutoffs).expect("preset tier table is valid")
    }

    /// Parses the TIER_THRESHOLDS setting: either a preset name (`six-tier`,
    /// `four-tier`) or a custom comma list such as
    /// `bronze=40,silver=56,gold=72,platinum=88`.
    pub fn from_spec(spec: &str) -> Result<Self, TierTableError> {
        match spec.trim().to_lowercase().as_str() {
            "" | "six-tier" => return Ok(Self::six_tier()),
            "four-tier" => return Ok(Self::four_tier()),
            _ => {}
        }

        let mut cutoffs = Vec::new();
        for entry in spec.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let (name, percent) = entry
                .split_once('=')
                .ok_or_else(|| TierTableError::Entry(entry.to_string()))?;
            let percent: u32 = percent
                .trim()
                .parse()
                .map_err(|_| TierTableError::Entry(entry.to_string()))?;
            if percent > 100 {
                return Err(TierTableError::OutOfRange(percent));
            }
            let tier = match name.trim().to_lowercase().as_str() {
                "certified" => CertificationTier::Certified,
                "bronze" => CertificationTier::Bronze,
                "silver" => CertificationTier::Silver,
                "gold" => CertificationTier::Gold,
                "platinum" => CertificationTier::Platinum,
                other => return Err(TierTableError::UnknownTier(other.to_string())),
            };
            cutoffs.push(TierCutoff {
                min_percent: percent as u8,
                tier,
            });
        }
        Self::new(cutoffs)
    }

    /// Highest cutoff the percent meets or exceeds wins; below all cutoffs
    /// the space is not certified.
    pub fn classify(&self, percent: u8) -> CertificationTier {
        self.cutoffs
            .iter()
            .rev()
            .find(|cutoff| percent >= cutoff.min_percent)
            .map(|cutoff| cutoff.tier)
            .unwrap_or(CertificationTier::NotCertified)
    }

    pub fn cutoffs(&self) -> &[TierCutoff] {
        &self.cutoffs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_tier_boundaries() {
        let table = TierTable::six_tier();
        assert_eq!(table.classify(0), CertificationTier::NotCertified);
        assert_eq!(table.classify(49), CertificationTier::NotCertified);
        assert_eq!(table.classify(50), CertificationTier::Certified);
        assert_eq!(table.classify(59), CertificationTier::Certified);
        assert_eq!(table.classify(60), CertificationTier::Bronze);
        assert_eq!(table.classify(70), CertificationTier::Silver);
        assert_eq!(table.classify(80), CertificationTier::Gold);
        assert_eq!(table.classify(89), CertificationTier::Gold);
        assert_eq!(table.classify(90), CertificationTier::Platinum);
        assert_eq!(table.classify(100), CertificationTier::Platinum);
    }

    #[test]
    fn four_tier_boundaries() {
        let table = TierTable::four_tier();
        assert_eq!(table.classify(39), CertificationTier::NotCertified);
        assert_eq!(table.classify(40), CertificationTier::Bronze);
        assert_eq!(table.classify(55), CertificationTier::Bronze);
        assert_eq!(table.classify(56), CertificationTier::Silver);
        assert_eq!(table.classify(72), CertificationTier::Gold);
        assert_eq!(table.classify(88), CertificationTier::Platinum);
        assert_eq!(table.classify(100), CertificationTier::Platinum);
    }

    #[test]
    fn classification_is_non_decreasing() {
        for table in [TierTable::six_tier(), TierTable::four_tier()] {
            let mut previous = table.classify(0);
            for percent in 1..=100u8 {
                let current = table.classify(percent);
                assert!(current >= previous, "tier dropped at {}%", percent);
                previous = current;
            }
        }
    }

    #[test]
    fn full_score_is_platinum_under_both_presets() {
        assert_eq!(
            TierTable::six_tier().classify(100),
            CertificationTier::Platinum
        );
        assert_eq!(
            TierTable::four_tier().classify(100),
            CertificationTier::Platinum
        );
    }

    #[test]
    fn custom_spec_parses() {
        let table = TierTable::from_spec("bronze=30, silver=50, gold=75, platinum=95").unwrap();
        assert_eq!(table.classify(29), CertificationTier::NotCertified);
        assert_eq!(table.classify(30), CertificationTier::Bronze);
        assert_eq!(table.classify(95), CertificationTier::Platinum);
    }

    #[test]
    fn preset_names_parse() {
        assert_eq!(TierTable::from_spec("six-tier").unwrap().cutoffs().len(), 5);
        assert_eq!(
            TierTable::from_spec("four-tier").unwrap().cutoffs().len(),
            4
        );
    }

    #[test]
    fn non_monotonic_tables_are_rejected() {
        assert!(matches!(
            TierTable::from_spec("silver=40,bronze=60"),
            Err(TierTableError::NotMonotonic)
        ));
        assert!(matches!(
            TierTable::from_spec("bronze=60,silver=50"),
            Err(TierTableError::NotMonotonic)
        ));
    }

    #[test]
    fn malformed_specs_are_rejected() {
        assert!(matches!(
            TierTable::from_spec("bronze"),
            Err(TierTableError::Entry(_))
        ));
        assert!(matches!(
            TierTable::from_spec("copper=40"),
            Err(TierTableError::UnknownTier(_))
        ));
        assert!(matches!(
            TierTable::from_spec("bronze=140"),
            Err(TierTableError::OutOfRange(_))
        ));
        assert!(matches!(
            TierTable::from_spec(","),
            Err(TierTableError::Empty)
        ));
    }

    #[test]
    fn labels_round_trip() {
        for tier in [
            CertificationTier::NotCertified,
            CertificationTier::Certified,
            CertificationTier::Bronze,
            CertificationTier::Silver,
            CertificationTier::Gold,
            CertificationTier::Platinum,
        ] {
            assert_eq!(CertificationTier::from_label(tier.label()), tier);
        }
    }

    #[test]
    fn legacy_markup_is_stripped_from_labels() {
        assert_eq!(
            CertificationTier::from_label("<span style=\"color:#c9a227\">Gold</span>"),
            CertificationTier::Gold
        );
        assert_eq!(
            CertificationTier::from_label("\u{1F949} Bronze"),
            CertificationTier::Bronze
        );
        assert_eq!(
            CertificationTier::from_label("  platinum  "),
            CertificationTier::Platinum
        );
        assert_eq!(
            CertificationTier::from_label("champion"),
            CertificationTier::NotCertified
        );
    }

    #[test]
    fn only_medal_tiers_qualify_for_certificates() {
        assert!(!CertificationTier::NotCertified.qualifies_for_certificate());
        assert!(!CertificationTier::Certified.qualifies_for_certificate());
        assert!(CertificationTier::Bronze.qualifies_for_certificate());
        assert!(CertificationTier::Platinum.qualifies_for_certificate());
    }
}
