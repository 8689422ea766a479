//! Lineage membership rules
//!
//! Each rule picks, from the iLoci of one hiLocus, the members that belong to
//! its lineage. A rule with no qualifying members reports absence (`None`).

/// The species label an iLocus ID starts with, e.g. `PdomILC-01234` -> `Pdom`
pub fn ilocus_species(ilocus: &str) -> Option<&str> {
    ilocus.get(..4)
}

/// How a lineage treats species with more than one iLocus in a hiLocus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyMode {
    /// Any multi-copy species makes the lineage absent
    #[default]
    SingleCopy,
    /// A multi-copy species keeps its first listed iLocus
    Representative,
}

/// One iLocus assigned to a lineage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub species: String,
    pub ilocus: String,
    pub lineage: &'static str,
}

/// The four Hymenopteran lineages orthologs are selected from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lineage {
    Ants,
    Bees,
    /// Vespid wasps, represented by *Polistes dominula*
    Vespids,
    /// Parasitic wasps, represented by *Nasonia vitripennis*
    Parasitoids,
}

/// Report order: ants, bees, Pdom, Nvit
pub const LINEAGES: [Lineage; 4] = [
    Lineage::Ants,
    Lineage::Bees,
    Lineage::Vespids,
    Lineage::Parasitoids,
];

impl Lineage {
    pub fn label(self) -> &'static str {
        match self {
            Lineage::Ants => "Ants",
            Lineage::Bees => "Bees",
            Lineage::Vespids => "Vespids",
            Lineage::Parasitoids => "Parasitoids",
        }
    }

    pub fn species(self) -> &'static [&'static str] {
        match self {
            Lineage::Ants => &["Acep", "Aech", "Cflo", "Hsal", "Pbar", "Sinv"],
            Lineage::Bees => &["Ador", "Aflo", "Amel", "Bimp", "Bter", "Mrot"],
            Lineage::Vespids => &["Pdom"],
            Lineage::Parasitoids => &["Nvit"],
        }
    }

    pub fn contains(self, species: &str) -> bool {
        self.species().iter().any(|s| *s == species)
    }

    /// Members of this lineage among `iloci`, in input order.
    ///
    /// iLoci of species outside the lineage (outgroups included) are ignored.
    pub fn classify<S: AsRef<str>>(self, iloci: &[S], mode: CopyMode) -> Option<Vec<Member>> {
        let mut members: Vec<Member> = Vec::new();

        for ilocus in iloci {
            let ilocus = ilocus.as_ref();
            let Some(species) = ilocus_species(ilocus) else {
                continue;
            };
            if !self.contains(species) {
                continue;
            }

            if members.iter().any(|m| m.species == species) {
                match mode {
                    CopyMode::SingleCopy => return None,
                    CopyMode::Representative => continue,
                }
            }

            members.push(Member {
                species: species.to_string(),
                ilocus: ilocus.to_string(),
                lineage: self.label(),
            });
        }

        if members.is_empty() {
            None
        } else {
            Some(members)
        }
    }
}

impl std::fmt::Display for Lineage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn ids(members: &[Member]) -> Vec<&str> {
        members.iter().map(|m| m.ilocus.as_str()).collect()
    }

    #[test]
    fn test_ilocus_species() {
        assert_eq!(ilocus_species("PdomILC-01234"), Some("Pdom"));
        assert_eq!(ilocus_species("Nvi"), None);
    }

    #[test]
    fn test_lineages_partition_hymenoptera() {
        let mut seen: Vec<&str> = LINEAGES.iter().flat_map(|l| l.species().iter().copied()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 14);
        assert!(!seen.contains(&"Dmel"));
        assert!(!seen.contains(&"Tcas"));
    }

    #[test]
    fn test_classify_ants() {
        let iloci = ["AmelILC-00001", "HsalILC-00002", "CfloILC-00003", "DmelILC-00004"];
        let ants = Lineage::Ants.classify(&iloci, CopyMode::SingleCopy).unwrap();
        assert_eq!(ids(&ants), vec!["HsalILC-00002", "CfloILC-00003"]);
        assert!(ants.iter().all(|m| m.lineage == "Ants"));
        assert_eq!(ants[0].species, "Hsal");
    }

    #[test]
    fn test_classify_absent() {
        let iloci = ["AmelILC-00001", "NvitILC-00002"];
        assert!(Lineage::Vespids.classify(&iloci, CopyMode::SingleCopy).is_none());
    }

    #[test]
    fn test_multi_copy_single_mode_is_absent() {
        let iloci = ["PdomILC-00001", "PdomILC-00002"];
        assert!(Lineage::Vespids.classify(&iloci, CopyMode::SingleCopy).is_none());
    }

    #[test]
    fn test_multi_copy_representative_mode_keeps_first() {
        let iloci = ["BterILC-00009", "AmelILC-00001", "BterILC-00003"];
        let bees = Lineage::Bees.classify(&iloci, CopyMode::Representative).unwrap();
        assert_eq!(ids(&bees), vec!["BterILC-00009", "AmelILC-00001"]);
    }

    #[test]
    fn test_classify_owned_strings() {
        let iloci = vec!["NvitILC-00042".to_string()];
        let nvit = Lineage::Parasitoids.classify(&iloci, CopyMode::SingleCopy).unwrap();
        assert_eq!(nvit[0].lineage, "Parasitoids");
    }
}
