pub mod job_runner;
