mod criteria_test;
