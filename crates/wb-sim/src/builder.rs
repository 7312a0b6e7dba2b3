//! Fluent builder for constructing a [`Sim`].

use wb_combat::{CombatResolver, PlayerHealth};
use wb_core::{AiConfig, Dice, SimClock, SimRng, TickScheduler, Vec2};
use wb_squad::{SpawnConfig, SquadRegistry};
use wb_world::{Router, WorldData, WorldGraph};

use crate::{EventBus, Sim, SimResult};

/// Fluent builder for [`Sim<R, D>`].
///
/// # Required inputs
///
/// - [`AiConfig`]: tick rate, seed, and every behaviour tunable
/// - `R: Router`: the routing algorithm (e.g. [`wb_world::DijkstraRouter`])
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                          |
/// |-------------------------|----------------------------------|
/// | `.world(data)`          | No world; ticks are no-ops       |
/// | `.spawn_config(cfg)`    | `SpawnConfig::default()`         |
/// | `.dice(d)`              | `SimRng::new(config.seed)`       |
/// | `.player_position(p)`   | `Vec2::ZERO`                     |
/// | `.max_hp(n)`            | 100                              |
///
/// `build` loads the world graph but spawns nothing, so subscribers can be
/// attached before [`Sim::populate`] announces the first squads.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(AiConfig::default(), DijkstraRouter)
///     .world(data)
///     .build()?;
/// let _sub = sim.subscribe(|n| println!("{n:?}"));
/// sim.populate()?;
/// sim.advance(0.016, &mut NoopObserver);
/// ```
pub struct SimBuilder<R: Router, D: Dice = SimRng> {
    config: AiConfig,
    spawn:  SpawnConfig,
    router: R,
    dice:   D,
    world:  Option<WorldData>,
    player: Vec2,
    max_hp: i32,
}

impl<R: Router> SimBuilder<R, SimRng> {
    pub fn new(config: AiConfig, router: R) -> Self {
        let dice = SimRng::new(config.seed);
        Self {
            config,
            spawn: SpawnConfig::default(),
            router,
            dice,
            world: None,
            player: Vec2::ZERO,
            max_hp: 100,
        }
    }
}

impl<R: Router, D: Dice> SimBuilder<R, D> {
    /// Replace the seeded RNG, e.g. with [`wb_core::FixedDice`] in tests.
    pub fn dice<D2: Dice>(self, dice: D2) -> SimBuilder<R, D2> {
        SimBuilder {
            config: self.config,
            spawn:  self.spawn,
            router: self.router,
            dice,
            world:  self.world,
            player: self.player,
            max_hp: self.max_hp,
        }
    }

    pub fn world(mut self, data: WorldData) -> Self {
        self.world = Some(data);
        self
    }

    pub fn spawn_config(mut self, spawn: SpawnConfig) -> Self {
        self.spawn = spawn;
        self
    }

    pub fn player_position(mut self, pos: Vec2) -> Self {
        self.player = pos;
        self
    }

    pub fn max_hp(mut self, hp: i32) -> Self {
        self.max_hp = hp;
        self
    }

    /// Validate the configuration and build the graph.
    pub fn build(self) -> SimResult<Sim<R, D>> {
        self.config.validate()?;
        self.spawn.validate()?;
        let graph = self.world.as_ref().map(WorldGraph::from_data).transpose()?;

        Ok(Sim {
            clock:     SimClock::new(self.config.tick_hz),
            scheduler: TickScheduler::new(self.config.tick_hz),
            combat:    CombatResolver::from_config(&self.config),
            health:    PlayerHealth::new(self.max_hp),
            registry:  SquadRegistry::new(),
            bus:       EventBus::new(),
            graph,
            config:    self.config,
            spawn:     self.spawn,
            router:    self.router,
            dice:      self.dice,
            player:    self.player,
        })
    }
}
