mod yaml_runner;

pub use yaml_runner::{
    ColumnSpec, TestCase, TestResult, load_test_cases_from_str, run_generator_test,
};
