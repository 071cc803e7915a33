//! Random browser user-agent generation.
//!
//! One string is generated at startup and shared by every session, so
//! the whole fleet presents a consistent browser fingerprint.

use rand::seq::SliceRandom;
use rand::Rng;

const CHROME_VERSIONS: [&str; 8] = [
    "118.0.0.0",
    "119.0.0.0",
    "120.0.0.0",
    "121.0.0.0",
    "122.0.0.0",
    "123.0.0.0",
    "124.0.0.0",
    "125.0.0.0",
];

const FIREFOX_VERSIONS: [&str; 6] = ["120.0", "121.0", "122.0", "123.0", "124.0", "125.0"];

const SAFARI_VERSIONS: [&str; 5] = ["16.5.2", "16.6", "17.2.1", "17.3.1", "17.4.1"];

const WINDOWS_VERSIONS: [&str; 3] = [
    "Windows NT 10.0; Win64; x64",
    "Windows NT 11.0; Win64; x64",
    "Windows NT 10.0; WOW64",
];

const MAC_VERSIONS: [&str; 4] = [
    "Macintosh; Intel Mac OS X 10_15_7",
    "Macintosh; Intel Mac OS X 12_6_8",
    "Macintosh; Intel Mac OS X 13_5_2",
    "Macintosh; Intel Mac OS X 14_1_2",
];

const LINUX_VERSIONS: [&str; 3] = [
    "X11; Linux x86_64",
    "X11; Ubuntu; Linux x86_64",
    "X11; Fedora; Linux x86_64",
];

/// Generate a random user agent string that mimics real browsers
///
/// Weighted roughly by market share: Chrome most of the time, then
/// Edge, Firefox, and Safari.
pub fn random_user_agent() -> String {
    let mut rng = rand::thread_rng();

    match rng.gen_range(0..100u32) {
        // Chrome (50%)
        0..=49 => {
            let version = CHROME_VERSIONS.choose(&mut rng).unwrap();
            let os = random_os(&mut rng);
            format!(
                "Mozilla/5.0 ({os}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{version} Safari/537.36"
            )
        }
        // Edge (20%)
        50..=69 => {
            let version = CHROME_VERSIONS.choose(&mut rng).unwrap();
            let os = WINDOWS_VERSIONS.choose(&mut rng).unwrap();
            format!(
                "Mozilla/5.0 ({os}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{version} Safari/537.36 Edg/{version}"
            )
        }
        // Firefox (20%)
        70..=89 => {
            let version = FIREFOX_VERSIONS.choose(&mut rng).unwrap();
            let os = random_os(&mut rng);
            format!("Mozilla/5.0 ({os}; rv:{version}) Gecko/20100101 Firefox/{version}")
        }
        // Safari (10%)
        _ => {
            let version = SAFARI_VERSIONS.choose(&mut rng).unwrap();
            let os = MAC_VERSIONS.choose(&mut rng).unwrap();
            format!(
                "Mozilla/5.0 ({os}) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/{version} Safari/605.1.15"
            )
        }
    }
}

fn random_os(rng: &mut impl Rng) -> &'static str {
    match rng.gen_range(0..3u32) {
        0 => WINDOWS_VERSIONS.choose(rng).copied().unwrap(),
        1 => MAC_VERSIONS.choose(rng).copied().unwrap(),
        _ => LINUX_VERSIONS.choose(rng).copied().unwrap(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_like_a_browser() {
        for _ in 0..100 {
            let ua = random_user_agent();
            assert!(ua.starts_with("Mozilla/5.0 ("), "unexpected prefix: {ua}");
            assert!(ua.len() > 40, "suspiciously short user agent: {ua}");
        }
    }

    #[test]
    fn covers_multiple_browsers() {
        let agents: Vec<String> = (0..200).map(|_| random_user_agent()).collect();
        assert!(agents.iter().any(|ua| ua.contains("Chrome/")));
        assert!(agents.iter().any(|ua| ua.contains("Firefox/")));
    }
}
