//! Stand-in yt-dlp executable for CLI tests
//!
//! The script mimics the three invocations the binary makes:
//! `--version`, `--dump-json ... -- URL` and the fetch call ending in `-- URL`.
//! URLs containing `describe-fail` fail the describe step, URLs containing
//! `fail` fail the fetch step, URLs containing `slow` hang in the fetch step.
//! Every fetched URL is appended to `fetch.log` next to the script.

use std::path::{Path, PathBuf};

const SCRIPT: &str = r#"#!/bin/sh
log="$(dirname "$0")/fetch.log"

if [ "$1" = "--version" ]; then
    echo "2024.08.06"
    exit 0
fi

describe=0
output=""
url=""
while [ $# -gt 0 ]; do
    case "$1" in
        --dump-json) describe=1 ;;
        --output) shift; output="$1" ;;
        --) shift; url="$1" ;;
    esac
    shift
done

if [ "$describe" = "1" ]; then
    case "$url" in
        *describe-fail*)
            echo "ERROR: [generic] Unsupported URL: $url" >&2
            exit 1
            ;;
    esac
    echo '{"title": "Fake Video", "uploader": "Fake Channel", "duration": 125}'
    exit 0
fi

echo "$url" >> "$log"

case "$url" in
    *slow*)
        exec sleep 30
        ;;
    *fail*)
        echo "ERROR: unable to download video data: HTTP Error 403: Forbidden" >&2
        exit 1
        ;;
esac

dir="$(dirname "$output")"
echo "[download] Destination: $dir/video.mp4"
touch "$dir/video.mp4"
exit 0
"#;

/// Write the fake tool into `dir` and return its path
#[cfg(unix)]
pub fn install_fake_ytdlp(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("yt-dlp");
    std::fs::write(&path, SCRIPT).expect("failed to write fake yt-dlp");
    let mut perms = std::fs::metadata(&path)
        .expect("failed to stat fake yt-dlp")
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("failed to chmod fake yt-dlp");
    path
}

/// URLs the fake tool was asked to fetch, in order
pub fn fetch_log(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join("fetch.log"))
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}
