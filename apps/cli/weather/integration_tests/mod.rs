mod binary;
mod runner;
