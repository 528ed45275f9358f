mod mapper_tests;
mod mutation_tests;
