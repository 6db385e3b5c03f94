mod basic_tests;
mod property_tests;
