//! Seed data: representative Nigerian infrastructure projects and
//! community champions loaded into the in-memory containers at startup.

use chrono::Utc;

use crate::models::{Champion, Project, ProjectStatus};

pub fn projects() -> Vec<Project> {
    let now = Utc::now();
    let mk = |id, title: &str, description: &str, category: &str, state: &str, lga: &str, budget, progress, contractor: &str, status| Project {
        id,
        title: title.into(),
        description: description.into(),
        category: category.into(),
        state: state.into(),
        lga: lga.into(),
        budget,
        progress,
        contractor: contractor.into(),
        status,
        created_at: now,
        updated_at: now,
    };

    vec![
        mk(
            1,
            "Lagos-Badagry Expressway Section II",
            "Reconstruction and expansion of the expressway between Orile and Agboju.",
            "Road",
            "Lagos",
            "Amuwo-Odofin",
            68_000_000_000,
            45,
            "CCECC Nigeria Ltd",
            ProjectStatus::Ongoing,
        ),
        mk(
            2,
            "Dala Water Reticulation Scheme",
            "Borehole network and overhead tanks serving twelve wards in Dala.",
            "Water",
            "Kano",
            "Dala",
            1_200_000_000,
            80,
            "Kano State Water Board",
            ProjectStatus::Ongoing,
        ),
        mk(
            3,
            "AMAC Primary Healthcare Centres",
            "Construction of six primary healthcare centres across the council area.",
            "Health",
            "FCT",
            "AMAC",
            3_500_000_000,
            100,
            "Julius Berger Nigeria",
            ProjectStatus::Completed,
        ),
        mk(
            4,
            "Ikeja Model School Rebuild",
            "Demolition and rebuild of three blocks at Ikeja Grammar School.",
            "Education",
            "Lagos",
            "Ikeja",
            850_000_000,
            10,
            "Unassigned",
            ProjectStatus::Planned,
        ),
        mk(
            5,
            "Port Harcourt Ring Road",
            "Phase one earthworks for the 50km ring road corridor.",
            "Road",
            "Rivers",
            "Obio-Akpor",
            195_000_000_000,
            5,
            "Lekki Concession Partners",
            ProjectStatus::Suspended,
        ),
        mk(
            6,
            "Ibadan North Rural Electrification",
            "Grid extension and transformer installation for eight communities.",
            "Power",
            "Oyo",
            "Ibadan North",
            2_100_000_000,
            60,
            "IBEDC Projects",
            ProjectStatus::Ongoing,
        ),
        mk(
            7,
            "Maiduguri Resettlement Housing",
            "500-unit housing estate for displaced families in Jere.",
            "Housing",
            "Borno",
            "Jere",
            7_800_000_000,
            0,
            "Unassigned",
            ProjectStatus::Abandoned,
        ),
    ]
}

pub fn champions() -> Vec<Champion> {
    let mk = |id: &str, name: &str, state: &str, lga: &str, verified_reports| Champion {
        id: id.into(),
        name: name.into(),
        state: state.into(),
        lga: lga.into(),
        verified_reports,
    };

    vec![
        mk("chp_001", "Adaeze Okonkwo", "Lagos", "Ikeja", 34),
        mk("chp_002", "Musa Abdullahi", "Kano", "Dala", 21),
        mk("chp_003", "Blessing Eze", "FCT", "AMAC", 17),
        mk("chp_004", "Tamuno Briggs", "Rivers", "Obio-Akpor", 9),
        mk("chp_005", "Folake Adeyemi", "Oyo", "Ibadan North", 12),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_projects_have_unique_ids() {
        let projects = projects();
        let mut ids: Vec<u32> = projects.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), projects.len());
    }

    #[test]
    fn seed_covers_every_status() {
        let projects = projects();
        for status in [
            ProjectStatus::Planned,
            ProjectStatus::Ongoing,
            ProjectStatus::Completed,
            ProjectStatus::Abandoned,
            ProjectStatus::Suspended,
        ] {
            assert!(projects.iter().any(|p| p.status == status), "missing {status:?}");
        }
    }
}
