mod facade_test;
mod multi_threaded_test;
