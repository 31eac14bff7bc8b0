mod auth_test;
mod helpers;
mod journal_test;
mod router_test;
mod user_test;
