//! What a report displays for the selected organization.
//!
//! Everything here is derived data: the renderer decides how it looks.

use crate::config::*;

/// Overall digital visibility, from the organization score.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum VisibilityLevel {
    /// Score below 25.
    Low,
    /// Score from 25 to 50, inclusive.
    Moderate,
    /// Score above 50.
    Dynamic,
}

impl VisibilityLevel {
    pub fn from_score(score: u8) -> VisibilityLevel {
        if score < 25 {
            VisibilityLevel::Low
        } else if score <= 50 {
            VisibilityLevel::Moderate
        } else {
            VisibilityLevel::Dynamic
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VisibilityLevel::Low => "Faible",
            VisibilityLevel::Moderate => "Modéré",
            VisibilityLevel::Dynamic => "Dynamique",
        }
    }

    pub fn status(self) -> &'static str {
        match self {
            VisibilityLevel::Low => "À améliorer",
            VisibilityLevel::Moderate => "En développement",
            VisibilityLevel::Dynamic => "Excellent",
        }
    }

    /// Advice shown under the score.
    pub fn description(self) -> &'static str {
        match self {
            VisibilityLevel::Low => {
                "Votre visibilité digitale nécessite une attention immédiate. Il est crucial de développer votre présence sur les plateformes digitales essentielles pour rester compétitif."
            }
            VisibilityLevel::Moderate => {
                "Votre entreprise a établi une base digitale solide, mais il existe encore des opportunités d'amélioration pour maximiser votre visibilité en ligne."
            }
            VisibilityLevel::Dynamic => {
                "Excellent ! Votre entreprise démontre une forte maturité digitale avec une présence bien établie sur les principales plateformes. Continuez à maintenir cette excellence."
            }
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            VisibilityLevel::Low => "📊",
            VisibilityLevel::Moderate => "🎯",
            VisibilityLevel::Dynamic => "🏆",
        }
    }
}

/// The organization compared to the population, on one platform.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Trend {
    Up,
    Down,
    Equal,
}

impl Trend {
    fn compare(organization: u8, average: u8) -> Trend {
        match organization.cmp(&average) {
            std::cmp::Ordering::Greater => Trend::Up,
            std::cmp::Ordering::Less => Trend::Down,
            std::cmp::Ordering::Equal => Trend::Equal,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Trend::Up => "↗",
            Trend::Down => "↘",
            Trend::Equal => "=",
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PlatformComparison {
    pub platform: &'static Platform,
    pub present: bool,
    /// 100 when present, 0 otherwise.
    pub organization_percent: u8,
    pub average_percent: u8,
    pub trend: Trend,
}

/// Everything the renderer receives from the core.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub selected_organization: &'a OrganizationRecord,
    pub stats: &'a AggregateStats,
    pub record_count: usize,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportView {
    pub organization: OrganizationRecord,
    pub visibility: VisibilityLevel,
    /// In platform order.
    pub platforms: Vec<PlatformComparison>,
    pub global_average: u8,
    pub record_count: usize,
}

pub fn project(input: &ReportInput) -> ReportView {
    let org = input.selected_organization;
    let platforms = PLATFORMS
        .iter()
        .map(|p| {
            let present = org.presence.get(p.key);
            let organization_percent = if present { 100 } else { 0 };
            let average_percent = input.stats.average(p.key);
            PlatformComparison {
                platform: p,
                present,
                organization_percent,
                average_percent,
                trend: Trend::compare(organization_percent, average_percent),
            }
        })
        .collect();
    ReportView {
        organization: org.clone(),
        visibility: VisibilityLevel::from_score(org.score),
        platforms,
        global_average: input.stats.global_average,
        record_count: input.record_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_thresholds() {
        assert_eq!(VisibilityLevel::from_score(0), VisibilityLevel::Low);
        assert_eq!(VisibilityLevel::from_score(24), VisibilityLevel::Low);
        assert_eq!(VisibilityLevel::from_score(25), VisibilityLevel::Moderate);
        assert_eq!(VisibilityLevel::from_score(50), VisibilityLevel::Moderate);
        assert_eq!(VisibilityLevel::from_score(51), VisibilityLevel::Dynamic);
        assert_eq!(VisibilityLevel::from_score(100), VisibilityLevel::Dynamic);
    }

    #[test]
    fn visibility_presentation() {
        let low = VisibilityLevel::from_score(12);
        assert_eq!(low.label(), "Faible");
        assert_eq!(low.status(), "À améliorer");
        assert_eq!(low.icon(), "📊");
        assert!(low.description().contains("attention immédiate"));

        let moderate = VisibilityLevel::from_score(50);
        assert_eq!(moderate.icon(), "🎯");
        assert!(moderate.description().contains("base digitale solide"));

        let dynamic = VisibilityLevel::from_score(88);
        assert_eq!(dynamic.icon(), "🏆");
        assert!(dynamic.description().starts_with("Excellent !"));
    }

    #[test]
    fn platform_trends() {
        let mut presence = Presence::default();
        presence.set(PlatformKey::Facebook, true);
        presence.set(PlatformKey::Website, true);
        let org = OrganizationRecord {
            id: "organization-1".to_string(),
            name: "Acme".to_string(),
            presence,
            score: 25,
            access_code: "A".to_string(),
        };
        let mut per_platform_average = [40u8; PLATFORM_COUNT];
        per_platform_average[PlatformKey::Website.index()] = 100;
        per_platform_average[PlatformKey::YouTube.index()] = 0;
        let stats = AggregateStats {
            per_platform_average,
            global_average: 31,
        };

        let view = project(&ReportInput {
            selected_organization: &org,
            stats: &stats,
            record_count: 12,
        });

        assert_eq!(view.visibility, VisibilityLevel::Moderate);
        assert_eq!(view.global_average, 31);
        assert_eq!(view.record_count, 12);
        let trends: Vec<Trend> = view.platforms.iter().map(|p| p.trend).collect();
        assert_eq!(
            trends,
            vec![
                Trend::Up,    // Facebook
                Trend::Down,  // LinkedIn
                Trend::Down,  // Instagram
                Trend::Equal, // Website
                Trend::Down,  // Google My Business
                Trend::Down,  // Pages Jaunes
                Trend::Equal, // YouTube
                Trend::Down,  // Tripadvisor
            ]
        );
        assert_eq!(view.platforms[0].platform.key, PlatformKey::Facebook);
        assert_eq!(view.platforms[0].organization_percent, 100);
        assert_eq!(view.platforms[1].organization_percent, 0);
    }
}
