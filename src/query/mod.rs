pub mod predicate;
pub mod matching;
pub mod descriptor;
pub mod planner;
