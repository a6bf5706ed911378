mod im2col_tests;
