mod helpers;

mod account_test;
mod credentials_test;
mod signin_link_test;
