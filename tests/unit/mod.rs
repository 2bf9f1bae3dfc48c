mod concurrency_tests;
mod property_tests;
mod validation_tests;
