mod registry_test;
mod timestamps_test;
mod unique_test;
mod validation_test;
