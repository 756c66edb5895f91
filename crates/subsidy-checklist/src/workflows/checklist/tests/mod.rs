mod common;
mod routing;
mod synthesis;
