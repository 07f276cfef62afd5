mod conflicts_test;
mod middleware_test;
mod options_test;
mod public_test;
mod shared_schedule_test;
mod test_utils;
