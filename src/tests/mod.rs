mod parallel_tests;
mod type_info_tests;
mod utils;
mod visit_tests;
