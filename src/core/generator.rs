/// The session pipeline: previous session + catalogs → next session.
///
/// Runs a fixed sequence of stages (player faction, bots, hirelings, map,
/// landmarks). Each stage builds a biased candidate pool, draws from it
/// without replacement, and claims its factions so later stages cannot
/// reuse them.
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use thiserror::Error;

use crate::core::bias::{
    continuity_pool, hireling_pool, uniform_pool, BOT_BIAS, MAP_BIAS, PLAYER_BIAS,
};
use crate::core::config::GenerationConfig;
use crate::core::exclusion::Exclusions;
use crate::core::random::RandomSource;
use crate::core::sampler::{CandidatePool, SampleError};
use crate::schema::catalog::{Catalog, CatalogError, FactionId, HirelingRank, Named};
use crate::schema::session::{HirelingPick, SessionRecord, HIRELING_SLOTS, LANDMARK_SLOTS};

/// Result type for session generation.
pub type SetupResult<T> = Result<T, SetupError>;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no eligible candidates left for {0}")]
    EmptyPool(Stage),
    #[error("{stage}: {candidates} candidates but no weight to choose between them")]
    DegenerateWeights { stage: Stage, candidates: usize },
    #[error("previous session references unknown {0}")]
    InvalidPreviousRecord(String),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl SetupError {
    fn sampling(stage: Stage, err: SampleError) -> Self {
        match err {
            SampleError::EmptyPool => Self::EmptyPool(stage),
            SampleError::DegenerateWeights(candidates) => {
                Self::DegenerateWeights { stage, candidates }
            }
        }
    }
}

/// Pipeline position. Stages run strictly in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    PlayerFaction,
    BotFactions,
    Hirelings,
    Map,
    Landmarks,
    Done,
}

impl Stage {
    pub fn next(self) -> Self {
        match self {
            Self::PlayerFaction => Self::BotFactions,
            Self::BotFactions => Self::Hirelings,
            Self::Hirelings => Self::Map,
            Self::Map => Self::Landmarks,
            Self::Landmarks | Self::Done => Self::Done,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::PlayerFaction => "player faction",
            Self::BotFactions => "bot factions",
            Self::Hirelings => "hirelings",
            Self::Map => "map",
            Self::Landmarks => "landmarks",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// State threaded between stages of a single run.
struct Run<'p> {
    previous: &'p SessionRecord,
    record: SessionRecord,
    exclusions: Exclusions,
}

/// Generates the next session from a catalog and a previous session.
///
/// The generator holds no randomness of its own; every call takes the
/// random source for that run.
#[derive(Debug, Clone)]
pub struct SessionGenerator<'c> {
    catalog: &'c Catalog,
    config: GenerationConfig,
}

impl<'c> SessionGenerator<'c> {
    /// The bot count is brought back into `1..=MAX_BOT_ENEMIES` here, so a
    /// hand-built config cannot change the shape of the record.
    pub fn new(catalog: &'c Catalog, config: GenerationConfig) -> Self {
        let bots = config.bot_enemies;
        let config = config.with_bot_enemies(bots);
        if config.bot_enemies != bots {
            log::warn!(
                "bot_enemies {} out of range, using {}",
                bots,
                config.bot_enemies
            );
        }
        Self { catalog, config }
    }

    /// Generate with a fresh `StdRng` seeded from the config.
    pub fn generate_seeded(&self, previous: &SessionRecord) -> SetupResult<SessionRecord> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        self.generate(previous, &mut rng)
    }

    /// Generate `count` alternative sessions, each from its own seed offset.
    pub fn generate_variants(
        &self,
        previous: &SessionRecord,
        count: usize,
    ) -> SetupResult<Vec<SessionRecord>> {
        (0..count)
            .map(|i| {
                let seed = self.config.seed.wrapping_add(i as u64 * 7919);
                let mut rng = StdRng::seed_from_u64(seed);
                self.generate(previous, &mut rng)
            })
            .collect()
    }

    /// Run the full pipeline. Any stage failure aborts the run.
    pub fn generate<R>(&self, previous: &SessionRecord, rng: &mut R) -> SetupResult<SessionRecord>
    where
        R: RandomSource + ?Sized,
    {
        if let Some(unknown) = previous.find_unknown(self.catalog) {
            return Err(SetupError::InvalidPreviousRecord(unknown));
        }

        let mut run = Run {
            previous,
            record: SessionRecord::empty(self.config.bot_enemies),
            exclusions: Exclusions::new(),
        };

        let mut stage = Stage::PlayerFaction;
        while stage != Stage::Done {
            match stage {
                Stage::PlayerFaction => self.pick_player(&mut run, rng)?,
                Stage::BotFactions => self.pick_bots(&mut run, rng)?,
                Stage::Hirelings => self.pick_hirelings(&mut run, rng)?,
                Stage::Map => self.pick_map(&mut run, rng)?,
                Stage::Landmarks => self.pick_landmarks(&mut run, rng)?,
                Stage::Done => {}
            }
            stage = stage.next();
        }

        log::info!(
            "generated session: player {:?}, bots {:?}, hirelings {:?}, map {:?}",
            run.record.player_faction(),
            run.record.bot_factions(),
            run.record.hireling_factions(),
            run.record.map_id(),
        );
        Ok(run.record)
    }

    fn pick_player<R>(&self, run: &mut Run<'_>, rng: &mut R) -> SetupResult<()>
    where
        R: RandomSource + ?Sized,
    {
        let previous: Vec<FactionId> = run.previous.player_faction().into_iter().collect();
        let mut pool = continuity_pool(
            run.exclusions.eligible(&self.catalog.player_factions),
            &previous,
            PLAYER_BIAS,
        );
        log_pool(Stage::PlayerFaction, &pool);

        let id = draw(Stage::PlayerFaction, &mut pool, rng)?;
        run.record.player = Some(self.named_faction(id)?);
        run.exclusions.claim(id);
        log::debug!("player faction: {:?}", id);
        Ok(())
    }

    fn pick_bots<R>(&self, run: &mut Run<'_>, rng: &mut R) -> SetupResult<()>
    where
        R: RandomSource + ?Sized,
    {
        let wanted = self.config.bot_enemies;
        let mut pool = continuity_pool(
            run.exclusions.eligible(&self.catalog.bot_factions),
            &run.previous.bot_factions(),
            BOT_BIAS,
        );
        log_pool(Stage::BotFactions, &pool);
        if pool.len() < wanted {
            log::warn!(
                "{} bot factions wanted but only {} eligible",
                wanted,
                pool.len()
            );
        }

        for slot in 0..wanted {
            let id = draw(Stage::BotFactions, &mut pool, rng)?;
            run.record.bots[slot] = Some(self.named_faction(id)?);
            run.exclusions.claim(id);
            log::debug!("bot {}: {:?}", slot, id);
        }
        Ok(())
    }

    fn pick_hirelings<R>(&self, run: &mut Run<'_>, rng: &mut R) -> SetupResult<()>
    where
        R: RandomSource + ?Sized,
    {
        if !self.config.use_hirelings {
            log::debug!("hirelings disabled");
            return Ok(());
        }

        let count = rng.next_below(HIRELING_SLOTS + 1);
        log::debug!("drawing {} hirelings", count);
        if count == 0 {
            return Ok(());
        }

        let hireling_factions: Vec<FactionId> =
            self.catalog.hirelings.iter().map(|h| h.faction).collect();
        let mut pool = hireling_pool(
            run.exclusions.eligible(&hireling_factions),
            &run.previous.hireling_factions(),
        );
        log_pool(Stage::Hirelings, &pool);

        for slot in 0..count {
            let rank = HirelingRank::from_index(rng.next_below(2));
            let faction = draw(Stage::Hirelings, &mut pool, rng)?;
            let name = self
                .catalog
                .hireling_variant(faction, rank)
                .ok_or(CatalogError::UnknownFaction(faction, "hirelings"))?;
            run.record.hirelings[slot] = Some(HirelingPick {
                faction,
                rank,
                name: name.to_string(),
            });
            run.exclusions.claim(faction);
            log::debug!("hireling {}: {:?} ({:?})", slot, faction, rank);
        }
        Ok(())
    }

    fn pick_map<R>(&self, run: &mut Run<'_>, rng: &mut R) -> SetupResult<()>
    where
        R: RandomSource + ?Sized,
    {
        let previous: Vec<_> = run.previous.map_id().into_iter().collect();
        let mut pool = continuity_pool(self.catalog.maps.iter().map(|m| m.id), &previous, MAP_BIAS);
        log_pool(Stage::Map, &pool);

        let id = draw(Stage::Map, &mut pool, rng)?;
        run.record.map = self.catalog.map(id);
        log::debug!("map: {:?}", id);
        Ok(())
    }

    fn pick_landmarks<R>(&self, run: &mut Run<'_>, rng: &mut R) -> SetupResult<()>
    where
        R: RandomSource + ?Sized,
    {
        if !self.config.use_landmarks {
            log::debug!("landmarks disabled");
            return Ok(());
        }

        let count = rng.next_below(LANDMARK_SLOTS + 1);
        log::debug!("drawing {} landmarks", count);
        if count == 0 {
            return Ok(());
        }

        let mut pool = uniform_pool(self.catalog.landmarks.iter().map(|l| l.id));
        log_pool(Stage::Landmarks, &pool);

        for slot in 0..count {
            let id = draw(Stage::Landmarks, &mut pool, rng)?;
            run.record.landmarks[slot] = self.catalog.landmark(id);
            log::debug!("landmark {}: {:?}", slot, id);
        }
        Ok(())
    }

    fn named_faction(&self, id: FactionId) -> SetupResult<Named<FactionId>> {
        self.catalog
            .faction(id)
            .ok_or(SetupError::Catalog(CatalogError::UnknownFaction(id, "factions")))
    }
}

fn draw<I, R>(stage: Stage, pool: &mut CandidatePool<I>, rng: &mut R) -> SetupResult<I>
where
    I: Copy + PartialEq,
    R: RandomSource + ?Sized,
{
    pool.draw(rng).map_err(|e| SetupError::sampling(stage, e))
}

fn log_pool<I>(stage: Stage, pool: &CandidatePool<I>)
where
    I: Copy + PartialEq,
{
    log::debug!(
        "{}: {} candidates, total weight {:.3}",
        stage,
        pool.len(),
        pool.total_weight()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MAX_BOT_ENEMIES;
    use crate::core::random::ScriptedSource;
    use crate::schema::catalog::{
        LandmarkId, ALLIANCE, AUTUMN, CITY, CORVID, EYRIE, FERRY, MARQUISE, RIVERFOLK, TOWER,
    };

    fn root() -> Catalog {
        Catalog::root().unwrap()
    }

    #[test]
    fn stages_advance_in_order() {
        let mut stage = Stage::PlayerFaction;
        let mut seen = vec![stage];
        while stage != Stage::Done {
            stage = stage.next();
            seen.push(stage);
        }
        assert_eq!(
            seen,
            vec![
                Stage::PlayerFaction,
                Stage::BotFactions,
                Stage::Hirelings,
                Stage::Map,
                Stage::Landmarks,
                Stage::Done,
            ]
        );
        assert_eq!(Stage::Done.next(), Stage::Done);
    }

    #[test]
    fn all_zero_draws_pick_first_candidates() {
        // Every draw of 0.0 takes the first pool entry and zero-length counts.
        let catalog = root();
        let generator = SessionGenerator::new(&catalog, GenerationConfig::default());
        let mut src = ScriptedSource::constant(0.0);
        let record = generator.generate(&SessionRecord::empty(2), &mut src).unwrap();

        assert_eq!(record.player_faction(), Some(MARQUISE));
        assert_eq!(record.bot_factions(), vec![EYRIE, ALLIANCE]);
        assert!(record.hirelings.iter().all(Option::is_none));
        assert_eq!(record.map_id(), Some(AUTUMN));
        assert!(record.landmarks.iter().all(Option::is_none));
        assert_eq!(src.draws(), 6);
    }

    #[test]
    fn disabled_categories_stay_empty() {
        let catalog = root();
        let config = GenerationConfig::default()
            .with_hirelings(false)
            .with_landmarks(false)
            .with_bot_enemies(1);
        let generator = SessionGenerator::new(&catalog, config);
        let mut src = ScriptedSource::constant(0.99);
        let record = generator.generate(&SessionRecord::empty(1), &mut src).unwrap();
        assert_eq!(record.bots.len(), 1);
        assert!(record.hirelings.iter().all(Option::is_none));
        assert!(record.landmarks.iter().all(Option::is_none));
        // Player, one bot and the map; no count draws for disabled stages.
        assert_eq!(src.draws(), 3);
    }

    #[test]
    fn out_of_range_bot_count_is_clamped() {
        let catalog = root();
        let zero = GenerationConfig {
            bot_enemies: 0,
            ..GenerationConfig::default()
        };
        let record = SessionGenerator::new(&catalog, zero)
            .generate_seeded(&SessionRecord::default())
            .unwrap();
        assert_eq!(record.bots.len(), 1);
        assert!(record.bots.iter().all(Option::is_some));

        let seven = GenerationConfig {
            bot_enemies: 7,
            ..GenerationConfig::default()
        };
        let record = SessionGenerator::new(&catalog, seven)
            .generate_seeded(&SessionRecord::default())
            .unwrap();
        assert_eq!(record.bots.len(), MAX_BOT_ENEMIES);
        assert!(record.bots.iter().all(Option::is_some));
    }

    #[test]
    fn unknown_previous_id_is_rejected() {
        let catalog = root();
        let generator = SessionGenerator::new(&catalog, GenerationConfig::default());
        let mut previous = SessionRecord::empty(2);
        previous.player = Some(Named::new(FactionId(42), "Moles in Space"));
        let err = generator
            .generate(&previous, &mut ScriptedSource::constant(0.5))
            .unwrap_err();
        assert!(matches!(err, SetupError::InvalidPreviousRecord(_)));
    }

    fn rejection(generator: &SessionGenerator<'_>, previous: &SessionRecord) -> String {
        let mut src = ScriptedSource::constant(0.5);
        let err = generator.generate(previous, &mut src).unwrap_err();
        assert_eq!(src.draws(), 0);
        match err {
            SetupError::InvalidPreviousRecord(slot) => slot,
            other => panic!("expected InvalidPreviousRecord, got {:?}", other),
        }
    }

    #[test]
    fn unknown_ids_in_every_slot_are_rejected() {
        let catalog = root();
        let generator = SessionGenerator::new(&catalog, GenerationConfig::default());

        let mut previous = SessionRecord::empty(2);
        previous.bots[1] = Some(Named::new(FactionId(42), "Moles in Space"));
        assert_eq!(rejection(&generator, &previous), "bot faction FactionId(42)");

        let mut previous = SessionRecord::empty(2);
        previous.hirelings[0] = Some(HirelingPick {
            faction: FactionId(99),
            rank: HirelingRank::Primary,
            name: "Mercenary Moles".to_string(),
        });
        assert_eq!(rejection(&generator, &previous), "hireling faction FactionId(99)");

        let mut previous = SessionRecord::empty(2);
        previous.landmarks[2] = Some(Named::new(LandmarkId(17), "Sunken Bridge"));
        assert_eq!(rejection(&generator, &previous), "landmark LandmarkId(17)");
    }

    #[test]
    fn exhausted_bot_pool_is_fatal() {
        let mut catalog = root();
        catalog.bot_factions = vec![MARQUISE, CORVID];
        let generator = SessionGenerator::new(&catalog, GenerationConfig::default());
        // Player draw 0.0 takes Marquise, leaving one bot for two slots.
        let err = generator
            .generate(&SessionRecord::empty(2), &mut ScriptedSource::constant(0.0))
            .unwrap_err();
        assert!(matches!(err, SetupError::EmptyPool(Stage::BotFactions)));
    }

    #[test]
    fn empty_map_catalog_is_fatal() {
        let mut catalog = root();
        catalog.maps.clear();
        let generator = SessionGenerator::new(&catalog, GenerationConfig::default());
        let err = generator
            .generate(&SessionRecord::empty(2), &mut ScriptedSource::constant(0.0))
            .unwrap_err();
        assert!(matches!(err, SetupError::EmptyPool(Stage::Map)));
    }

    #[test]
    fn landmarks_never_repeat() {
        let catalog = root();
        let generator = SessionGenerator::new(&catalog, GenerationConfig::default());
        // 0.99 asks for three landmarks; 0.0 then takes the head of the pool each time.
        let mut src = ScriptedSource::new(vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.99, 0.0, 0.0, 0.0]);
        let record = generator.generate(&SessionRecord::empty(2), &mut src).unwrap();
        assert_eq!(record.landmark_ids(), vec![TOWER, FERRY, CITY]);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let catalog = root();
        let generator =
            SessionGenerator::new(&catalog, GenerationConfig::default().with_seed(1234));
        let mut previous = SessionRecord::empty(2);
        previous.player = catalog.faction(RIVERFOLK);
        previous.bots = vec![catalog.faction(CORVID), catalog.faction(ALLIANCE)];
        previous.map = catalog.map(AUTUMN);

        let a = generator.generate_seeded(&previous).unwrap();
        let b = generator.generate_seeded(&previous).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn variants_differ_in_seed() {
        let catalog = root();
        let generator = SessionGenerator::new(&catalog, GenerationConfig::default());
        let variants = generator
            .generate_variants(&SessionRecord::empty(2), 8)
            .unwrap();
        assert_eq!(variants.len(), 8);
        assert!(variants.iter().any(|v| v != &variants[0]));
    }
}
