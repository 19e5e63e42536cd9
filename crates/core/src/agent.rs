//! One racing agent: position, timers, and the per-tick movement state
//! machine. Path selection lives in [`policy`].

mod policy;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use crate::config::BehaviorProfile;
use crate::maze::Maze;
use crate::types::{AgentId, AgentKind, AgentStatus, CellKind, Direction, Point};

pub(crate) const BOOST_DURATION_MS: f64 = 3000.0;
pub(crate) const TRAP_DISORIENT_MS: f64 = 3000.0;
const DISORIENT_FACTOR: f64 = 0.5;

/// What a single `update` call did, consumed by the race coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepEvent {
    /// Not moving, paused, or still accumulating toward the next step.
    Waiting,
    Moved,
    /// The step landed on the finish cell. Reported at most once; the
    /// coordinator flips the agent to `Finished` in response.
    ReachedFinish,
}

pub struct Agent {
    id: AgentId,
    kind: AgentKind,
    profile: BehaviorProfile,
    is_player: bool,
    position: Point,
    facing: Direction,
    /// Sampled once at creation: base speed plus uniform variation.
    speed: f64,
    path: Vec<Point>,
    cursor: usize,
    status: AgentStatus,
    step_accumulator_ms: f64,
    boost_remaining_ms: f64,
    disoriented_remaining_ms: f64,
    stuck_remaining_ms: f64,
    elapsed_ms: f64,
    finish_rank: Option<u32>,
    finish_elapsed_ms: Option<f64>,
    steps_taken: u32,
    rng: ChaCha8Rng,
}

impl Agent {
    pub fn new(
        kind: AgentKind,
        profile: BehaviorProfile,
        position: Point,
        seed: u64,
        is_player: bool,
    ) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let variation = profile.speed_variation;
        let mut speed = profile.base_speed;
        if variation > 0.0 {
            speed += rng.gen_range(-variation..=variation);
        }

        Self {
            id: AgentId::default(),
            kind,
            profile,
            is_player,
            position,
            facing: Direction::Right,
            speed: speed.max(0.1),
            path: Vec::new(),
            cursor: 0,
            status: AgentStatus::Idle,
            step_accumulator_ms: 0.0,
            boost_remaining_ms: 0.0,
            disoriented_remaining_ms: 0.0,
            stuck_remaining_ms: 0.0,
            elapsed_ms: 0.0,
            finish_rank: None,
            finish_elapsed_ms: None,
            steps_taken: 0,
            rng,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: AgentId) {
        self.id = id;
    }

    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    pub fn is_player(&self) -> bool {
        self.is_player
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn status(&self) -> AgentStatus {
        self.status
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn steps_taken(&self) -> u32 {
        self.steps_taken
    }

    pub fn finish_rank(&self) -> Option<u32> {
        self.finish_rank
    }

    pub fn finish_elapsed_ms(&self) -> Option<f64> {
        self.finish_elapsed_ms
    }

    pub fn is_boosted(&self) -> bool {
        self.boost_remaining_ms > 0.0
    }

    pub fn is_disoriented(&self) -> bool {
        self.disoriented_remaining_ms > 0.0
    }

    pub fn is_stuck(&self) -> bool {
        self.stuck_remaining_ms > 0.0
    }

    /// Transitions to `Moving` with a freshly decided path.
    pub fn start(&mut self, maze: &Maze) {
        if self.status == AgentStatus::Finished {
            return;
        }
        self.status = AgentStatus::Moving;
        self.step_accumulator_ms = 0.0;
        self.regenerate_path(maze);
    }

    pub fn stop(&mut self) {
        if self.status == AgentStatus::Moving {
            self.status = AgentStatus::Idle;
        }
    }

    /// Full reset to `Idle` at `start`, clearing every timer and result.
    pub fn reset(&mut self, start: Point) {
        self.position = start;
        self.facing = Direction::Right;
        self.path.clear();
        self.cursor = 0;
        self.status = AgentStatus::Idle;
        self.step_accumulator_ms = 0.0;
        self.boost_remaining_ms = 0.0;
        self.disoriented_remaining_ms = 0.0;
        self.stuck_remaining_ms = 0.0;
        self.elapsed_ms = 0.0;
        self.finish_rank = None;
        self.finish_elapsed_ms = None;
        self.steps_taken = 0;
    }

    /// Records the final rank exactly once; repeat calls are ignored.
    pub fn finish(&mut self, rank: u32) -> bool {
        if self.status == AgentStatus::Finished {
            return false;
        }
        self.status = AgentStatus::Finished;
        self.finish_rank = Some(rank);
        self.finish_elapsed_ms = Some(self.elapsed_ms);
        log::info!("{} finished at rank {rank} after {:.0}ms", self.kind.name(), self.elapsed_ms);
        true
    }

    /// Advances timers and takes at most one step when enough time has
    /// accumulated (speed is steps per second, so the step interval is
    /// `1000 / effective_speed` ms; the remainder is carried over).
    pub fn update(&mut self, maze: &Maze, delta_ms: f64) -> StepEvent {
        if self.status != AgentStatus::Moving {
            return StepEvent::Waiting;
        }
        self.elapsed_ms += delta_ms;

        if self.stuck_remaining_ms > 0.0 {
            self.stuck_remaining_ms -= delta_ms;
            if self.stuck_remaining_ms > 0.0 {
                return StepEvent::Waiting;
            }
            self.stuck_remaining_ms = 0.0;
            log::debug!("{} resumes after a dead-end pause", self.kind.name());
        }

        if self.boost_remaining_ms > 0.0 {
            self.boost_remaining_ms -= delta_ms;
            if self.boost_remaining_ms <= 0.0 {
                self.boost_remaining_ms = 0.0;
                log::debug!("{} loses turbo", self.kind.name());
            }
        }
        if self.disoriented_remaining_ms > 0.0 {
            self.disoriented_remaining_ms -= delta_ms;
            if self.disoriented_remaining_ms <= 0.0 {
                self.disoriented_remaining_ms = 0.0;
                log::debug!("{} is no longer disoriented", self.kind.name());
            }
        }

        let step_interval_ms = 1000.0 / self.effective_speed();
        self.step_accumulator_ms += delta_ms;
        if self.step_accumulator_ms < step_interval_ms {
            return StepEvent::Waiting;
        }
        self.step_accumulator_ms -= step_interval_ms;
        self.take_step(maze)
    }

    fn effective_speed(&self) -> f64 {
        let mut speed = self.speed;
        if self.is_boosted() {
            speed *= self.profile.boost_multiplier;
        }
        if self.is_disoriented() {
            speed *= DISORIENT_FACTOR;
        }
        speed
    }

    fn take_step(&mut self, maze: &Maze) -> StepEvent {
        // An exhausted path is replaced before stepping so the tick still
        // produces movement.
        if self.cursor + 1 >= self.path.len() {
            self.regenerate_path(maze);
        }
        let Some(&next) = self.path.get(self.cursor + 1) else {
            return StepEvent::Waiting;
        };

        if let Some(direction) = Direction::between(self.position, next) {
            self.facing = direction;
        }
        self.position = next;
        self.cursor += 1;
        self.steps_taken += 1;

        if self.position == maze.finish() {
            return StepEvent::ReachedFinish;
        }

        match maze.cell_kind_at(self.position) {
            CellKind::Trap => {
                self.disoriented_remaining_ms = TRAP_DISORIENT_MS;
                log::debug!("{} hit a trap", self.kind.name());
            }
            CellKind::Boost => self.activate_boost(),
            _ => {}
        }

        StepEvent::Moved
    }

    pub(crate) fn activate_boost(&mut self) {
        self.boost_remaining_ms = BOOST_DURATION_MS;
        log::debug!("{} activates turbo", self.kind.name());
    }

    fn regenerate_path(&mut self, maze: &Maze) {
        self.path = self.decide_path(maze);
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::tests::corridor_maze;
    use crate::mazegen::model::{GeneratedMaze, MazeGrid};

    fn steady_profile() -> BehaviorProfile {
        BehaviorProfile {
            base_speed: 2.0,
            speed_variation: 0.0,
            wrong_path_probability: 0.0,
            detour_probability: 0.0,
            boost_probability: 0.0,
            ..BehaviorProfile::default()
        }
    }

    fn steady_agent(maze: &Maze) -> Agent {
        let mut agent = Agent::new(AgentKind::Racer, steady_profile(), maze.start(), 7, true);
        agent.start(maze);
        agent
    }

    #[test]
    fn speed_two_takes_exactly_two_steps_in_two_600ms_ticks() {
        let maze = corridor_maze(8);
        let mut agent = steady_agent(&maze);

        assert_eq!(agent.update(&maze, 600.0), StepEvent::Moved);
        assert_eq!(agent.update(&maze, 600.0), StepEvent::Moved);
        assert_eq!(agent.steps_taken(), 2);
        assert_eq!(agent.position(), Point { row: 1, col: 3 });
    }

    #[test]
    fn no_step_before_the_interval_elapses() {
        let maze = corridor_maze(8);
        let mut agent = steady_agent(&maze);

        // Interval at speed 2 is 500ms.
        assert_eq!(agent.update(&maze, 200.0), StepEvent::Waiting);
        assert_eq!(agent.update(&maze, 200.0), StepEvent::Waiting);
        assert_eq!(agent.update(&maze, 200.0), StepEvent::Moved);
    }

    #[test]
    fn idle_and_finished_agents_ignore_updates() {
        let maze = corridor_maze(8);
        let mut agent = Agent::new(AgentKind::Racer, steady_profile(), maze.start(), 7, false);
        assert_eq!(agent.update(&maze, 10_000.0), StepEvent::Waiting);

        agent.start(&maze);
        agent.finish(1);
        assert_eq!(agent.update(&maze, 10_000.0), StepEvent::Waiting);
        assert_eq!(agent.steps_taken(), 0);
    }

    #[test]
    fn reaching_finish_is_reported_and_finish_is_idempotent() {
        let maze = corridor_maze(3);
        let mut agent = steady_agent(&maze);

        let mut reached = 0;
        for _ in 0..10 {
            if agent.update(&maze, 500.0) == StepEvent::ReachedFinish {
                reached += 1;
                assert!(agent.finish(1));
                break;
            }
        }
        assert_eq!(reached, 1);
        assert_eq!(agent.status(), AgentStatus::Finished);
        assert!(!agent.finish(2), "second finish signal must be ignored");
        assert_eq!(agent.finish_rank(), Some(1));
        assert!(agent.finish_elapsed_ms().is_some());
    }

    #[test]
    fn trap_cell_disorients_and_halves_speed() {
        let mut grid = MazeGrid::filled(3, 10, CellKind::Wall);
        for col in 1..9 {
            grid.set_cell(Point { row: 1, col }, CellKind::Path);
        }
        let start = Point { row: 1, col: 1 };
        let finish = Point { row: 1, col: 8 };
        grid.set_cell(start, CellKind::Start);
        grid.set_cell(finish, CellKind::Finish);
        grid.set_cell(Point { row: 1, col: 2 }, CellKind::Trap);
        let maze =
            Maze::from_generated(GeneratedMaze { grid, start, finish }).expect("connected");

        let mut agent = steady_agent(&maze);
        assert_eq!(agent.update(&maze, 500.0), StepEvent::Moved);
        assert!(agent.is_disoriented());

        // Disoriented interval is 1000ms, so one more 500ms tick cannot step.
        assert_eq!(agent.update(&maze, 500.0), StepEvent::Waiting);
        assert_eq!(agent.update(&maze, 500.0), StepEvent::Moved);

        // The 3000ms debuff expires while time keeps accruing.
        for _ in 0..6 {
            agent.update(&maze, 500.0);
        }
        assert!(!agent.is_disoriented());
    }

    #[test]
    fn boost_cell_activates_turbo_and_expires() {
        let mut grid = MazeGrid::filled(3, 10, CellKind::Wall);
        for col in 1..9 {
            grid.set_cell(Point { row: 1, col }, CellKind::Path);
        }
        let start = Point { row: 1, col: 1 };
        let finish = Point { row: 1, col: 8 };
        grid.set_cell(start, CellKind::Start);
        grid.set_cell(finish, CellKind::Finish);
        grid.set_cell(Point { row: 1, col: 2 }, CellKind::Boost);
        let maze =
            Maze::from_generated(GeneratedMaze { grid, start, finish }).expect("connected");

        let mut agent = steady_agent(&maze);
        assert_eq!(agent.update(&maze, 500.0), StepEvent::Moved);
        assert!(agent.is_boosted());

        for _ in 0..7 {
            agent.update(&maze, 500.0);
        }
        assert!(!agent.is_boosted());
    }

    #[test]
    fn stuck_pause_suppresses_movement_until_it_elapses() {
        let maze = corridor_maze(8);
        let mut agent = steady_agent(&maze);
        agent.stuck_remaining_ms = 1000.0;

        assert_eq!(agent.update(&maze, 600.0), StepEvent::Waiting);
        assert!(agent.is_stuck());
        // The pause expires mid-tick; movement resumes on the next step.
        assert_eq!(agent.update(&maze, 600.0), StepEvent::Moved);
        assert!(!agent.is_stuck());
    }

    #[test]
    fn reset_restores_a_clean_idle_agent() {
        let maze = corridor_maze(8);
        let mut agent = steady_agent(&maze);
        agent.update(&maze, 500.0);
        agent.activate_boost();
        agent.finish(3);

        agent.reset(maze.start());
        assert_eq!(agent.status(), AgentStatus::Idle);
        assert_eq!(agent.position(), maze.start());
        assert_eq!(agent.finish_rank(), None);
        assert_eq!(agent.steps_taken(), 0);
        assert!(!agent.is_boosted());
    }
}
