//! `init` installs the global dispatcher, so it runs in its own test binary
//! to stay clear of the capture layer installed by the unit tests.

use annotator_core::logging_facility::{init, Profile};

#[test]
fn test_init_idempotent() {
    init(Profile::Test);
    init(Profile::Test);
    init(Profile::Test);
}
