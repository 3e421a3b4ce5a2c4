mod convertible_test;
