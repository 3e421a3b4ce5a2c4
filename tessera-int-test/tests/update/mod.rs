mod array_update_test;
