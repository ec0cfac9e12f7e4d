mod activation_tests;
mod fixture;
mod traverse_tests;
