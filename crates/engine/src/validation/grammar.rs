use regex::Regex;
use std::sync::LazyLock;

// Zero or more `/segment` components with an optional trailing slash. The empty
// string and a bare "/" both match; requiredness is checked separately.
static MOUNT_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(/[A-Za-z0-9_.-]+)*/?$").expect("mount path pattern"));

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    )
    .expect("email pattern")
});

const EMAIL_MAX_LEN: usize = 254;
const LOCAL_PART_MAX_LEN: usize = 64;

pub fn is_mount_path(value: &str) -> bool {
    MOUNT_PATH.is_match(value)
}

pub fn is_email(value: &str) -> bool {
    if value.len() > EMAIL_MAX_LEN {
        return false;
    }
    match value.split_once('@') {
        Some((local, _)) if local.len() <= LOCAL_PART_MAX_LEN => EMAIL.is_match(value),
        _ => false,
    }
}
