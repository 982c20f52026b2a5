pub const OAUTH_TOKEN: &str = "oauth/token";
pub const GROUPS_ME: &str = "v3/groups/me";

pub fn group_devices(group: &str) -> String {
    format!("v2/groups/{group}/devices")
}

pub fn group_categories(group: &str) -> String {
    format!("v2/group/{group}/categories/all?chart=history")
}

/// Segments of the points path; the window bounds contain spaces and are
/// percent-encoded when pushed onto the URL.
pub fn device_points<'a>(
    device: &'a str,
    parameter: &'a str,
    start: &'a str,
    end: &'a str,
) -> [&'a str; 9] {
    [
        "v2", "devices", device, "points", parameter, start, end, "average", "none",
    ]
}
