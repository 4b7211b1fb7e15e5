use std::{collections::{BTreeSet, HashMap}, sync::Arc};

use uuid::Uuid;

use crate::{
    entities::{
        matching::{MatchQuery, MatchedSwap, SkillMatch},
        profile::ProfileSummary,
        skill::{Skill, SkillType},
    },
    errors::AppError,
    repositories::{profile::ProfileRepository, skill::SkillRepository},
};

/// Pairs every learn skill with every teach skill of the identical name
/// owned by someone else. Names compare case-sensitively.
pub fn find_matches(learn: &[Skill], teach: &[Skill]) -> Vec<SkillMatch> {
    let mut teachers_by_name: HashMap<&str, Vec<&Skill>> = HashMap::new();
    for skill in teach.iter().filter(|s| s.skill_type == SkillType::Teach) {
        teachers_by_name.entry(skill.name.as_str()).or_default().push(skill);
    }

    learn
        .iter()
        .filter(|s| s.skill_type == SkillType::Learn)
        .flat_map(|wanted| {
            teachers_by_name
                .get(wanted.name.as_str())
                .into_iter()
                .flatten()
                .filter(move |offered| offered.user_id != wanted.user_id)
                .map(move |offered| SkillMatch {
                    skill_name: wanted.name.clone(),
                    learner_id: wanted.user_id,
                    teacher_id: offered.user_id,
                    learn_skill_id: wanted.id,
                    teach_skill_id: offered.id,
                })
        })
        .collect()
}

/// Placeholder results served outside production when nothing matches.
pub fn sample_matches() -> Vec<MatchedSwap> {
    let sample = |n: u128, skill_name: &str, teacher_name: &str, bio: &str| {
        let teacher_id = Uuid::from_u128(0x5a3e_0000_0000_0000_0000_0000_0000_0100 + n);
        MatchedSwap {
            pairing: SkillMatch {
                skill_name: skill_name.to_string(),
                learner_id: Uuid::from_u128(0x5a3e_0000_0000_0000_0000_0000_0000_0200 + n),
                teacher_id,
                learn_skill_id: Uuid::from_u128(0x5a3e_0000_0000_0000_0000_0000_0000_0300 + n),
                teach_skill_id: Uuid::from_u128(0x5a3e_0000_0000_0000_0000_0000_0000_0400 + n),
            },
            teacher_profile: Some(ProfileSummary {
                id: teacher_id,
                full_name: Some(teacher_name.to_string()),
                bio: Some(bio.to_string()),
            }),
        }
    };

    vec![
        sample(1, "React", "Sample Teacher", "Frontend developer happy to pair on React."),
        sample(2, "Python", "Sample Mentor", "Data engineer teaching Python basics."),
    ]
}

pub struct MatchHandler {
    pub skill_repo: Arc<dyn SkillRepository>,
    pub profile_repo: Arc<dyn ProfileRepository>,
    serve_samples: bool,
}

impl MatchHandler {
    pub fn new(
        skill_repo: Arc<dyn SkillRepository>,
        profile_repo: Arc<dyn ProfileRepository>,
        serve_samples: bool,
    ) -> Self {
        MatchHandler { skill_repo, profile_repo, serve_samples }
    }

    pub async fn matched_swaps(&self, query: &MatchQuery) -> Result<Vec<MatchedSwap>, AppError> {
        let skill = query.skill.as_ref().map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        let mut learn = self.skill_repo.list_skills_by_type(SkillType::Learn, skill.clone()).await?;
        if let Some(learner_id) = query.learner_id {
            learn.retain(|s| s.user_id == learner_id);
        }
        let teach = self.skill_repo.list_skills_by_type(SkillType::Teach, skill).await?;

        let pairings = find_matches(&learn, &teach);
        if pairings.is_empty() && self.serve_samples {
            tracing::debug!("No matches found, serving sample results");
            return Ok(sample_matches());
        }

        let teacher_ids: Vec<Uuid> = pairings
            .iter()
            .map(|m| m.teacher_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let profiles: HashMap<Uuid, ProfileSummary> = self.profile_repo
            .get_profile_summaries(&teacher_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(pairings
            .into_iter()
            .map(|pairing| MatchedSwap {
                teacher_profile: profiles.get(&pairing.teacher_id).cloned(),
                pairing,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entities::skill::ProficiencyLevel,
        repositories::{profile::MockProfileRepository, skill::MockSkillRepository},
    };
    use chrono::Utc;

    fn skill(user_id: Uuid, name: &str, skill_type: SkillType) -> Skill {
        Skill {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            description: None,
            category: None,
            skill_type,
            proficiency_level: ProficiencyLevel::Intermediate,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn every_opposite_pair_appears_exactly_once() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let learn = vec![skill(a, "Rust", SkillType::Learn), skill(b, "Rust", SkillType::Learn)];
        let teach = vec![skill(b, "Rust", SkillType::Teach), skill(c, "Rust", SkillType::Teach)];

        let matches = find_matches(&learn, &teach);

        // a<-b, a<-c, b<-c; b never teaches itself.
        assert_eq!(matches.len(), 3);
        for (learner, teacher) in [(a, b), (a, c), (b, c)] {
            let count = matches
                .iter()
                .filter(|m| m.learner_id == learner && m.teacher_id == teacher)
                .count();
            assert_eq!(count, 1);
        }
        assert!(matches.iter().all(|m| m.learner_id != m.teacher_id));
    }

    #[test]
    fn names_must_match_exactly() {
        let learn = vec![skill(Uuid::new_v4(), "react", SkillType::Learn)];
        let teach = vec![skill(Uuid::new_v4(), "React", SkillType::Teach)];

        assert!(find_matches(&learn, &teach).is_empty());
    }

    fn empty_repos() -> (MockSkillRepository, MockProfileRepository) {
        let mut skills = MockSkillRepository::new();
        skills.expect_list_skills_by_type().returning(|_, _| Ok(vec![]));
        let mut profiles = MockProfileRepository::new();
        profiles.expect_get_profile_summaries().returning(|_| Ok(vec![]));
        (skills, profiles)
    }

    #[tokio::test]
    async fn empty_result_falls_back_to_samples_outside_production() {
        let (skills, profiles) = empty_repos();
        let handler = MatchHandler::new(Arc::new(skills), Arc::new(profiles), true);
        let query = MatchQuery { skill: Some("React".into()), learner_id: None };

        assert_eq!(handler.matched_swaps(&query).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn empty_result_stays_empty_in_production() {
        let (skills, profiles) = empty_repos();
        let handler = MatchHandler::new(Arc::new(skills), Arc::new(profiles), false);
        let query = MatchQuery { skill: Some("React".into()), learner_id: None };

        assert!(handler.matched_swaps(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn teacher_profiles_are_attached_when_present() {
        let (learner, teacher) = (Uuid::new_v4(), Uuid::new_v4());

        let mut skills = MockSkillRepository::new();
        skills.expect_list_skills_by_type().returning(move |kind, _| {
            Ok(match kind {
                SkillType::Learn => vec![skill(learner, "Go", SkillType::Learn)],
                SkillType::Teach => vec![skill(teacher, "Go", SkillType::Teach)],
            })
        });
        let mut profiles = MockProfileRepository::new();
        profiles.expect_get_profile_summaries().returning(move |ids| {
            assert_eq!(ids, [teacher]);
            Ok(vec![ProfileSummary { id: teacher, full_name: Some("Tess".into()), bio: None }])
        });

        let handler = MatchHandler::new(Arc::new(skills), Arc::new(profiles), true);
        let swaps = handler.matched_swaps(&MatchQuery::default()).await.unwrap();

        assert_eq!(swaps.len(), 1);
        assert_eq!(swaps[0].teacher_profile.as_ref().and_then(|p| p.full_name.as_deref()), Some("Tess"));
    }
}
