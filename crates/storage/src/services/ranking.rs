//! Ranking aggregator: computes grouped, tie-broken standings for a
//! competition from its completed races and a ranking-system configuration.
//!
//! The aggregation itself is a pure function over in-memory snapshots so the
//! grouping, journey and tie-break rules are testable without a database;
//! `rankings_for_competition` is the repository-backed entry point.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::ranking::{
    EntityKind, EntityRef, GroupMetadata, RankingEntry, RankingScore, RankingsResponse,
    StageInfo, StagePoints,
};
use crate::error::{Result, StorageError};
use crate::models::{
    EntityType, Gender, GroupBy, JourneyMode, LaneStatus, PointMode, RankingSystem, ScoringMode,
};
use crate::repository::ranking::RankingRepository;

use super::scoring::{self, LaneOutcome, MedalTally, NonFinisherRule, PointTable};

/// Category reference data carried on every race snapshot for grouping and
/// display metadata.
#[derive(Debug, Clone)]
pub struct CategoryMeta {
    pub category_id: Uuid,
    pub code: String,
    pub title_es: String,
    pub title_en: String,
    pub gender: Gender,
    pub masters: bool,
}

#[derive(Debug, Clone)]
pub struct ClubRef {
    pub club_id: Uuid,
    pub short_code: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct CrewRef {
    pub athlete_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct EntrantSnapshot {
    pub entry_id: Uuid,
    pub display_name: String,
    pub club: ClubRef,
    pub crew: Vec<CrewRef>,
}

#[derive(Debug, Clone)]
pub struct LaneSnapshot {
    pub lane_number: i32,
    pub finish_time: Option<Decimal>,
    pub status: LaneStatus,
    pub entrant: EntrantSnapshot,
}

/// One completed race as the aggregator consumes it: result data plus the
/// event/stage coordinates needed for grouping and journey selection.
#[derive(Debug, Clone)]
pub struct RaceSnapshot {
    pub stage_number: i32,
    pub stage_name: String,
    pub boat_class_id: Uuid,
    pub lane_capacity: u32,
    pub gender: Gender,
    pub category: CategoryMeta,
    pub lanes: Vec<LaneSnapshot>,
}

impl RaceSnapshot {
    /// Logical event identity across stages: the same boat class, category
    /// and gender re-raced on another journey leg is the same event.
    fn event_key(&self) -> (Uuid, Uuid, Gender) {
        (self.boat_class_id, self.category.category_id, self.gender)
    }
}

struct Contribution {
    stage_number: i32,
    event_key: (Uuid, Uuid, Gender),
    group_key: String,
    entity: EntityRef,
    position: Option<u32>,
    points: u32,
}

/// Entity-eligibility filters are resolved before aggregation; this is the
/// one the portal exposes directly.
pub fn filter_masters(races: Vec<RaceSnapshot>, include_masters: bool) -> Vec<RaceSnapshot> {
    if include_masters {
        races
    } else {
        races.into_iter().filter(|r| !r.category.masters).collect()
    }
}

/// Builds the effective point table for a system from its stored rows;
/// systems without rows use the federation default table.
pub fn build_point_table(system: &RankingSystem, rows: &[(i32, i32)]) -> PointTable {
    let max = system.max_scoring_position.max(0) as u32;
    if rows.is_empty() {
        return PointTable::new(scoring::DEFAULT_POINT_TABLE.to_vec(), max);
    }
    let top = rows.iter().map(|(p, _)| *p).max().unwrap_or(0).max(0) as usize;
    let mut values = vec![0u32; top];
    for (position, points) in rows {
        if *position >= 1 {
            values[*position as usize - 1] = (*points).max(0) as u32;
        }
    }
    PointTable::new(values, max)
}

pub fn compute_rankings(
    system: &RankingSystem,
    table: &PointTable,
    races: &[RaceSnapshot],
) -> Result<RankingsResponse> {
    let stages: BTreeMap<i32, String> = races
        .iter()
        .map(|r| (r.stage_number, r.stage_name.clone()))
        .collect();

    let mut group_metadata: BTreeMap<String, GroupMetadata> = BTreeMap::new();
    let mut contributions: Vec<Contribution> = Vec::new();

    for race in races {
        if race.lanes.is_empty() {
            return Err(StorageError::inconsistency(format!(
                "race in stage {} has no lanes",
                race.stage_number
            )));
        }

        let rule = if system.dnf_gets_points_if_few_finishers {
            NonFinisherRule::ExtendIfSparse {
                lane_capacity: race.lane_capacity,
            }
        } else {
            NonFinisherRule::Exclude
        };

        let outcomes: Vec<LaneOutcome> = race
            .lanes
            .iter()
            .map(|lane| LaneOutcome {
                lane_number: lane.lane_number,
                finish_time: lane.finish_time,
                status: lane.status,
            })
            .collect();
        let placements = scoring::resolve_finish_order(&outcomes, rule)?;
        let position_by_lane: HashMap<i32, Option<u32>> = placements
            .into_iter()
            .map(|p| (p.lane_number, p.position))
            .collect();

        let (group_key, metadata) = group_for(system.group_by, race);
        group_metadata.entry(group_key.clone()).or_insert(metadata);

        for lane in &race.lanes {
            let position = position_by_lane
                .get(&lane.lane_number)
                .copied()
                .flatten();
            let points = table.points_for_position(position);
            for entity in route_entities(system, &lane.entrant)? {
                contributions.push(Contribution {
                    stage_number: race.stage_number,
                    event_key: race.event_key(),
                    group_key: group_key.clone(),
                    entity,
                    position,
                    points,
                });
            }
        }
    }

    let contributions = select_journeys(system, contributions)?;

    // Accumulate per group and entity.
    struct Acc {
        entity: EntityRef,
        points: u32,
        medals: MedalTally,
        position_counts: BTreeMap<u32, u32>,
        stage_points: BTreeMap<i32, u32>,
    }

    let mut groups: BTreeMap<String, HashMap<(EntityKind, Uuid), Acc>> = BTreeMap::new();
    for c in contributions {
        let acc = groups
            .entry(c.group_key)
            .or_default()
            .entry((c.entity.kind, c.entity.id))
            .or_insert_with(|| Acc {
                entity: c.entity.clone(),
                points: 0,
                medals: MedalTally::default(),
                position_counts: BTreeMap::new(),
                stage_points: BTreeMap::new(),
            });
        acc.points += c.points;
        *acc.stage_points.entry(c.stage_number).or_default() += c.points;
        if let Some(position) = c.position {
            *acc.position_counts.entry(position).or_default() += 1;
            acc.medals.count(position);
        }
    }

    let with_breakdown = system.journey_mode == JourneyMode::All && stages.len() > 1;

    let mut rankings: BTreeMap<String, Vec<RankingEntry>> = BTreeMap::new();
    for (group_key, accs) in groups {
        let mut accs: Vec<Acc> = accs.into_values().collect();

        // Order: score descending, then alphabetical so the listing is a
        // total order. Equal scores still share a rank below.
        match system.scoring_mode {
            ScoringMode::Points => accs.sort_by(|a, b| {
                b.points
                    .cmp(&a.points)
                    .then_with(|| a.entity.name.cmp(&b.entity.name))
            }),
            ScoringMode::Medals => accs.sort_by(|a, b| {
                medal_key(&b.medals)
                    .cmp(&medal_key(&a.medals))
                    .then_with(|| a.entity.name.cmp(&b.entity.name))
            }),
        }

        let mut entries = Vec::with_capacity(accs.len());
        let mut rank = 0u32;
        let mut prev: Option<(u32, u32, u32, u32)> = None;
        for (i, acc) in accs.into_iter().enumerate() {
            let key = match system.scoring_mode {
                ScoringMode::Points => (acc.points, 0, 0, 0),
                ScoringMode::Medals => medal_key(&acc.medals),
            };
            if prev != Some(key) {
                rank = i as u32 + 1;
            }
            prev = Some(key);

            let score = match system.scoring_mode {
                ScoringMode::Points => RankingScore::Points {
                    total: acc.points,
                    by_stage: with_breakdown.then(|| {
                        stages
                            .iter()
                            .map(|(number, _)| StagePoints {
                                stage_number: *number,
                                points: acc.stage_points.get(number).copied().unwrap_or(0),
                            })
                            .collect()
                    }),
                },
                ScoringMode::Medals => RankingScore::Medals {
                    gold: acc.medals.gold,
                    silver: acc.medals.silver,
                    bronze: acc.medals.bronze,
                    total: acc.medals.total(),
                },
            };

            entries.push(RankingEntry {
                rank,
                entity: acc.entity,
                score,
                position_counts: acc.position_counts,
            });
        }
        rankings.insert(group_key, entries);
    }

    Ok(RankingsResponse {
        system_id: system.system_id,
        group_by: system.group_by,
        scoring_mode: system.scoring_mode,
        stages: stages
            .into_iter()
            .map(|(number, name)| StageInfo { number, name })
            .collect(),
        rankings,
        group_metadata,
    })
}

fn medal_key(tally: &MedalTally) -> (u32, u32, u32, u32) {
    (tally.total(), tally.gold, tally.silver, tally.bronze)
}

/// Which entities a lane result counts toward. Athlete axis credits every
/// crew member; club axis credits the club, except in mixed point mode where
/// a single sculler's result stays with the athlete.
fn route_entities(system: &RankingSystem, entrant: &EntrantSnapshot) -> Result<Vec<EntityRef>> {
    if entrant.crew.is_empty() {
        return Err(StorageError::inconsistency(format!(
            "entry {} has no crew seats",
            entrant.entry_id
        )));
    }

    let club = EntityRef {
        id: entrant.club.club_id,
        name: entrant.club.name.clone(),
        kind: EntityKind::Club,
    };
    let athletes = || {
        entrant
            .crew
            .iter()
            .map(|member| EntityRef {
                id: member.athlete_id,
                name: member.name.clone(),
                kind: EntityKind::Athlete,
            })
            .collect::<Vec<_>>()
    };

    Ok(match system.entity_type {
        EntityType::Athlete => athletes(),
        EntityType::Club => {
            if system.point_mode == PointMode::Mixed && entrant.crew.len() == 1 {
                athletes()
            } else {
                vec![club]
            }
        }
    })
}

fn group_for(group_by: GroupBy, race: &RaceSnapshot) -> (String, GroupMetadata) {
    match group_by {
        GroupBy::Gender => (
            race.gender.as_str().to_string(),
            GroupMetadata {
                gender: Some(race.gender),
                category_code: None,
                title_es: None,
                title_en: None,
            },
        ),
        GroupBy::Category => (
            race.category.code.clone(),
            GroupMetadata {
                gender: Some(race.category.gender),
                category_code: Some(race.category.code.clone()),
                title_es: Some(race.category.title_es.clone()),
                title_en: Some(race.category.title_en.clone()),
            },
        ),
        GroupBy::CategoryGender => (
            format!("{}_{}", race.category.code, race.gender.as_str()),
            GroupMetadata {
                gender: Some(race.gender),
                category_code: Some(race.category.code.clone()),
                title_es: Some(race.category.title_es.clone()),
                title_en: Some(race.category.title_en.clone()),
            },
        ),
    }
}

/// Applies the journey mode: which stages count for each entity.
fn select_journeys(
    system: &RankingSystem,
    contributions: Vec<Contribution>,
) -> Result<Vec<Contribution>> {
    match system.journey_mode {
        JourneyMode::All => Ok(contributions),
        JourneyMode::FinalOnly => {
            // Per logical event, only its terminal (highest-numbered) stage.
            let mut terminal: HashMap<(Uuid, Uuid, Gender), i32> = HashMap::new();
            for c in &contributions {
                terminal
                    .entry(c.event_key)
                    .and_modify(|s| *s = (*s).max(c.stage_number))
                    .or_insert(c.stage_number);
            }
            Ok(contributions
                .into_iter()
                .filter(|c| terminal[&c.event_key] == c.stage_number)
                .collect())
        }
        JourneyMode::BestN => {
            let n = system
                .best_n_count
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    StorageError::validation("ranking system uses best_n without best_n_count")
                })? as usize;

            // Stage score per entity within its group, then keep the best n
            // stages (points descending, earliest stage breaks ties; medal
            // systems compare tallies the same way the final ranking does).
            let mut per_entity: HashMap<(String, EntityKind, Uuid), BTreeMap<i32, (u32, MedalTally)>> =
                HashMap::new();
            for c in &contributions {
                let slot = per_entity
                    .entry((c.group_key.clone(), c.entity.kind, c.entity.id))
                    .or_default()
                    .entry(c.stage_number)
                    .or_insert((0, MedalTally::default()));
                slot.0 += c.points;
                if let Some(position) = c.position {
                    slot.1.count(position);
                }
            }

            let mut kept: HashMap<(String, EntityKind, Uuid), Vec<i32>> = HashMap::new();
            for (key, stages) in per_entity {
                let mut ordered: Vec<(i32, (u32, MedalTally))> = stages.into_iter().collect();
                ordered.sort_by(|(stage_a, score_a), (stage_b, score_b)| {
                    let key_a = match system.scoring_mode {
                        ScoringMode::Points => (score_a.0, 0, 0, 0),
                        ScoringMode::Medals => medal_key(&score_a.1),
                    };
                    let key_b = match system.scoring_mode {
                        ScoringMode::Points => (score_b.0, 0, 0, 0),
                        ScoringMode::Medals => medal_key(&score_b.1),
                    };
                    key_b.cmp(&key_a).then(stage_a.cmp(stage_b))
                });
                kept.insert(key, ordered.into_iter().take(n).map(|(s, _)| s).collect());
            }

            Ok(contributions
                .into_iter()
                .filter(|c| {
                    kept.get(&(c.group_key.clone(), c.entity.kind, c.entity.id))
                        .is_some_and(|stages| stages.contains(&c.stage_number))
                })
                .collect())
        }
    }
}

/// Repository-backed entry point behind `GetRankings`. Read-only over an
/// as-of-now snapshot of the result store; unfinished stages simply do not
/// count yet.
pub async fn rankings_for_competition(
    pool: &PgPool,
    competition_id: Uuid,
    system_id: Uuid,
    include_masters: bool,
) -> Result<RankingsResponse> {
    let repo = RankingRepository::new(pool);
    let system = repo.find_system(system_id).await?;
    let rows = repo.load_point_table(system.system_id).await?;
    let table = build_point_table(&system, &rows);
    let races = repo.load_race_snapshots(competition_id).await?;
    let races = filter_masters(races, include_masters);
    compute_rankings(&system, &table, &races)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn system() -> RankingSystem {
        RankingSystem {
            system_id: Uuid::new_v4(),
            competition_id: None,
            name: "test".to_string(),
            group_by: GroupBy::CategoryGender,
            entity_type: EntityType::Athlete,
            scoring_mode: ScoringMode::Points,
            journey_mode: JourneyMode::All,
            best_n_count: None,
            point_mode: PointMode::Standard,
            max_scoring_position: 8,
            dnf_gets_points_if_few_finishers: false,
            created_at: chrono::NaiveDateTime::default(),
        }
    }

    fn senior(gender: Gender) -> CategoryMeta {
        CategoryMeta {
            category_id: Uuid::from_u128(1),
            code: "SEN".to_string(),
            title_es: "Senior".to_string(),
            title_en: "Senior".to_string(),
            gender,
            masters: false,
        }
    }

    fn club(n: u128) -> ClubRef {
        ClubRef {
            club_id: Uuid::from_u128(100 + n),
            short_code: format!("C{n}"),
            name: format!("Club {n}"),
        }
    }

    fn single(name: &str, athlete: u128, club_n: u128) -> EntrantSnapshot {
        EntrantSnapshot {
            entry_id: Uuid::new_v4(),
            display_name: name.to_string(),
            club: club(club_n),
            crew: vec![CrewRef {
                athlete_id: Uuid::from_u128(athlete),
                name: name.to_string(),
            }],
        }
    }

    fn lane(number: i32, secs: i64, entrant: EntrantSnapshot) -> LaneSnapshot {
        LaneSnapshot {
            lane_number: number,
            finish_time: Some(Decimal::new(secs, 0)),
            status: LaneStatus::Ok,
            entrant,
        }
    }

    fn race(stage: i32, lanes: Vec<LaneSnapshot>) -> RaceSnapshot {
        RaceSnapshot {
            stage_number: stage,
            stage_name: format!("Jornada {stage}"),
            boat_class_id: Uuid::from_u128(7),
            lane_capacity: 6,
            gender: Gender::Men,
            category: senior(Gender::Men),
            lanes,
        }
    }

    #[test]
    fn test_points_sum_within_race_is_bounded() {
        let system = system();
        let table = PointTable::default();
        let races = vec![race(
            1,
            vec![
                lane(1, 400, single("Ana", 1, 1)),
                lane(2, 390, single("Bea", 2, 1)),
                lane(3, 410, single("Cruz", 3, 2)),
            ],
        )];
        let output = compute_rankings(&system, &table, &races).unwrap();
        let group = &output.rankings["SEN_men"];
        let sum: u32 = group
            .iter()
            .map(|e| match &e.score {
                RankingScore::Points { total, .. } => *total,
                _ => 0,
            })
            .sum();
        assert!(sum <= 3 * table.points_for_position(Some(1)));
    }

    #[test]
    fn test_ranks_skip_after_tie() {
        let system = system();
        let table = PointTable::default();
        // Ana and Bea each win a heat (20 points); Cruz and Dani are the
        // runners-up (12 points). Ties share the rank, the next rank skips.
        let races = vec![
            race(
                1,
                vec![lane(1, 390, single("Ana", 1, 1)), lane(2, 400, single("Cruz", 3, 2))],
            ),
            race(
                1,
                vec![lane(1, 390, single("Bea", 2, 1)), lane(2, 400, single("Dani", 4, 2))],
            ),
        ];
        let output = compute_rankings(&system, &table, &races).unwrap();
        let group = &output.rankings["SEN_men"];
        assert_eq!(group[0].rank, 1);
        assert_eq!(group[0].entity.name, "Ana");
        assert_eq!(group[1].rank, 1);
        assert_eq!(group[1].entity.name, "Bea");
        assert_eq!(group[2].rank, 3);
        assert_eq!(group[2].entity.name, "Cruz");
        assert_eq!(group[3].rank, 3);
        assert_eq!(group[3].entity.name, "Dani");
    }

    #[test]
    fn test_best_n_keeps_best_two_stages() {
        let mut system = system();
        system.journey_mode = JourneyMode::BestN;
        system.best_n_count = Some(2);
        // Table: first place 20, second place 10.
        let table = PointTable::new(vec![20, 10], 8);

        // Stage 1: second (10). Stage 2: dnf (0). Stage 3: first (20).
        let rival = || single("Rival", 9, 2);
        let races = vec![
            race(1, vec![lane(1, 395, rival()), lane(2, 400, single("Ana", 1, 1))]),
            race(
                2,
                vec![
                    lane(1, 395, rival()),
                    LaneSnapshot {
                        lane_number: 2,
                        finish_time: None,
                        status: LaneStatus::Dnf,
                        entrant: single("Ana", 1, 1),
                    },
                ],
            ),
            race(3, vec![lane(1, 400, rival()), lane(2, 395, single("Ana", 1, 1))]),
        ];
        let output = compute_rankings(&system, &table, &races).unwrap();
        let group = &output.rankings["SEN_men"];
        let ana = group.iter().find(|e| e.entity.name == "Ana").unwrap();
        match &ana.score {
            RankingScore::Points { total, .. } => assert_eq!(*total, 30),
            _ => panic!("expected points"),
        }
    }

    #[test]
    fn test_final_only_uses_terminal_stage_per_event() {
        let mut system = system();
        system.journey_mode = JourneyMode::FinalOnly;
        let table = PointTable::default();
        let races = vec![
            race(1, vec![lane(1, 390, single("Ana", 1, 1)), lane(2, 400, single("Bea", 2, 2))]),
            race(2, vec![lane(1, 400, single("Ana", 1, 1)), lane(2, 390, single("Bea", 2, 2))]),
        ];
        let output = compute_rankings(&system, &table, &races).unwrap();
        let group = &output.rankings["SEN_men"];
        // Only stage 2 counts: Bea won it.
        assert_eq!(group[0].entity.name, "Bea");
        match &group[0].score {
            RankingScore::Points { total, .. } => assert_eq!(*total, 20),
            _ => panic!("expected points"),
        }
    }

    #[test]
    fn test_mixed_point_mode_routes_singles_to_athlete() {
        let mut system = system();
        system.entity_type = EntityType::Club;
        system.point_mode = PointMode::Mixed;
        let table = PointTable::default();

        let crew_entry = EntrantSnapshot {
            entry_id: Uuid::new_v4(),
            display_name: "Club 2 A".to_string(),
            club: club(2),
            crew: vec![
                CrewRef { athlete_id: Uuid::from_u128(21), name: "Uno".to_string() },
                CrewRef { athlete_id: Uuid::from_u128(22), name: "Dos".to_string() },
            ],
        };
        let races = vec![race(
            1,
            vec![lane(1, 390, single("Ana", 1, 1)), lane(2, 400, crew_entry)],
        )];
        let output = compute_rankings(&system, &table, &races).unwrap();
        let group = &output.rankings["SEN_men"];
        let kinds: Vec<(EntityKind, &str)> = group
            .iter()
            .map(|e| (e.entity.kind, e.entity.name.as_str()))
            .collect();
        assert!(kinds.contains(&(EntityKind::Athlete, "Ana")));
        assert!(kinds.contains(&(EntityKind::Club, "Club 2")));
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn test_medal_mode_breaks_ties_by_gold() {
        let mut system = system();
        system.scoring_mode = ScoringMode::Medals;
        let table = PointTable::default();
        // Ana: 1st and 3rd. Bea: 2nd and 2nd. Equal totals, Ana has gold.
        let races = vec![
            race(1, vec![lane(1, 390, single("Ana", 1, 1)), lane(2, 400, single("Bea", 2, 2))]),
            race(
                2,
                vec![
                    lane(1, 390, single("Zoe", 3, 2)),
                    lane(2, 395, single("Bea", 2, 2)),
                    lane(3, 400, single("Ana", 1, 1)),
                ],
            ),
        ];
        let output = compute_rankings(&system, &table, &races).unwrap();
        let group = &output.rankings["SEN_men"];
        assert_eq!(group[0].entity.name, "Ana");
        assert_eq!(group[0].rank, 1);
        let bea = group.iter().find(|e| e.entity.name == "Bea").unwrap();
        assert!(bea.rank > 1);
    }

    #[test]
    fn test_stage_breakdown_zero_fills_missing_stages() {
        let system = system();
        let table = PointTable::default();
        let races = vec![
            race(1, vec![lane(1, 390, single("Ana", 1, 1))]),
            race(2, vec![lane(1, 390, single("Bea", 2, 2))]),
        ];
        let output = compute_rankings(&system, &table, &races).unwrap();
        let group = &output.rankings["SEN_men"];
        let ana = group.iter().find(|e| e.entity.name == "Ana").unwrap();
        match &ana.score {
            RankingScore::Points { by_stage: Some(by_stage), .. } => {
                assert_eq!(by_stage.len(), 2);
                assert_eq!(by_stage[0].points, 20);
                assert_eq!(by_stage[1].points, 0);
            }
            _ => panic!("expected a per-stage breakdown"),
        }
    }

    #[test]
    fn test_race_without_lanes_is_fatal() {
        let system = system();
        let table = PointTable::default();
        let races = vec![race(1, vec![])];
        let err = compute_rankings(&system, &table, &races).unwrap_err();
        assert!(matches!(err, StorageError::Inconsistency(_)));
    }

    #[test]
    fn test_masters_filter_drops_masters_categories() {
        let mut masters_race = race(1, vec![lane(1, 390, single("Vet", 5, 1))]);
        masters_race.category.masters = true;
        masters_race.category.code = "VET".to_string();
        let open_race = race(1, vec![lane(1, 390, single("Ana", 1, 1))]);

        let kept = filter_masters(vec![masters_race.clone(), open_race.clone()], false);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].category.code, "SEN");

        let kept = filter_masters(vec![masters_race, open_race], true);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_empty_input_yields_empty_groups() {
        let system = system();
        let table = PointTable::default();
        let output = compute_rankings(&system, &table, &[]).unwrap();
        assert!(output.rankings.is_empty());
        assert!(output.stages.is_empty());
    }

    #[test]
    fn test_default_table_when_no_rows() {
        let system = system();
        let table = build_point_table(&system, &[]);
        assert_eq!(table.points_for_position(Some(1)), 20);
        assert_eq!(table.points_for_position(Some(8)), 1);
    }

    #[test]
    fn test_custom_table_rows() {
        let system = system();
        let table = build_point_table(&system, &[(1, 15), (2, 9), (3, 5)]);
        assert_eq!(table.points_for_position(Some(1)), 15);
        assert_eq!(table.points_for_position(Some(3)), 5);
        assert_eq!(table.points_for_position(Some(4)), 0);
    }
}
