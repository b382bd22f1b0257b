pub mod game_tester;
pub mod policy;
pub mod reports;
pub mod tester;

pub use game_tester::{GameTester, SimulationPlan, SimulationSummary, TesterAssets};
pub use policy::AnswerStrategy;
pub use tester::*;
