// Invoker contract tests against stub executables standing in for the
// external das element CLI. Unix-only: stubs are shell scripts.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use daselement::api::{Client, ErrorKind};
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn write_stub(dir: &Path, name: &str, script: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, script.as_ref()).expect("write stub");
    let mut perms = fs::metadata(&path).expect("stub metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod stub");
    path
}

#[test]
fn zero_exit_json_stdout_decodes() {
    init_tracing();
    let temp = tempfile::tempdir().expect("tempdir");
    let stub = write_stub(
        temp.path(),
        "das-element-cli",
        "#!/bin/sh\nprintf '{\"a\":1}\\n'\n",
    );

    let client = Client::new().with_standard_cli(stub.to_str().unwrap());
    let value = client.get_libraries().expect("decoded value");
    assert_eq!(value, json!({"a": 1}));
}

#[test]
fn tokens_reach_the_child_verbatim_without_a_shell() {
    let temp = tempfile::tempdir().expect("tempdir");
    // Compare the library token inside the stub; quotes and spaces must
    // survive as token content, which a shell would have re-interpreted.
    let stub = write_stub(
        temp.path(),
        "das-element-cli",
        concat!(
            "#!/bin/sh\n",
            "if [ \"$2\" = '\"/some path/with spaces.lib\"' ]; then m=true; else m=false; fi\n",
            "printf '{\"first\":\"%s\",\"library_intact\":%s,\"count\":%d}\\n' \"$1\" \"$m\" $#\n",
        ),
    );

    let client = Client::new().with_standard_cli(stub.to_str().unwrap());
    let value = client
        .get_category("/some path/with spaces.lib", "fire")
        .expect("decoded value");
    assert_eq!(value["first"], "get-category");
    assert_eq!(value["library_intact"], true);
    assert_eq!(value["count"], 3);
}

#[test]
fn nonzero_exit_is_a_process_error_with_streams() {
    let temp = tempfile::tempdir().expect("tempdir");
    let stub = write_stub(
        temp.path(),
        "das-element-cli",
        "#!/bin/sh\necho 'partial output'\necho 'database is locked' >&2\nexit 2\n",
    );

    let client = Client::new().with_standard_cli(stub.to_str().unwrap());
    let err = client.get_libraries().expect_err("process error");
    assert_eq!(err.kind(), ErrorKind::Process);
    assert_eq!(err.exit_code(), Some(2));
    assert_eq!(err.stdout(), Some("partial output"));
    assert_eq!(err.stderr(), Some("database is locked"));
    let command = err.command().expect("command line");
    assert!(command[0].ends_with("das-element-cli"));
    assert_eq!(command[1], "get-libraries");
}

#[test]
fn zero_exit_non_json_stdout_is_a_decode_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let stub = write_stub(
        temp.path(),
        "das-element-cli",
        "#!/bin/sh\nprintf 'not-json\\n'\n",
    );

    let client = Client::new().with_standard_cli(stub.to_str().unwrap());
    let err = client.get_libraries().expect_err("decode error");
    assert_eq!(err.kind(), ErrorKind::Decode);
    // Raw text carried verbatim, single trailing newline trimmed.
    assert_eq!(err.stdout(), Some("not-json"));
}

#[test]
fn stderr_noise_does_not_affect_a_successful_decode() {
    let temp = tempfile::tempdir().expect("tempdir");
    let stub = write_stub(
        temp.path(),
        "das-element-cli",
        "#!/bin/sh\necho 'deprecation warning' >&2\nprintf '[\"/a.exr\",\"/b.mov\"]\\n'\n",
    );

    let client = Client::new().with_standard_cli(stub.to_str().unwrap());
    let value = client
        .get_paths_from_disk("/mnt/media", true)
        .expect("decoded value");
    assert_eq!(value, json!(["/a.exr", "/b.mov"]));
}

#[test]
fn update_payload_round_trips_through_the_child() {
    let temp = tempfile::tempdir().expect("tempdir");
    // Echo the payload token back; the encoder's compact JSON must decode.
    let stub = write_stub(
        temp.path(),
        "das-element-cli",
        "#!/bin/sh\nprintf '%s\\n' \"$5\"\n",
    );

    let client = Client::new().with_standard_cli(stub.to_str().unwrap());
    let mut data = serde_json::Map::new();
    data.insert("rating".to_string(), json!(3));
    data.insert("tags".to_string(), json!(["flame", "fire"]));
    let value = client
        .update("/lib/a.lib", "Element", 1, &data)
        .expect("decoded value");
    assert_eq!(value, json!({"rating": 3, "tags": ["flame", "fire"]}));
}

#[test]
fn invalid_utf8_bytes_in_stdout_are_dropped() {
    let temp = tempfile::tempdir().expect("tempdir");
    // A stray non-UTF-8 byte inside a JSON string must vanish from the
    // decoded text rather than turn into a replacement character.
    let mut script = b"#!/bin/sh\nprintf '{\"name\":\"fi".to_vec();
    script.push(0xFF);
    script.extend_from_slice(b"re\"}\\n'\n");
    let stub = write_stub(temp.path(), "das-element-cli", script);

    let client = Client::new().with_standard_cli(stub.to_str().unwrap());
    let value = client.get_libraries().expect("decoded value");
    assert_eq!(value, json!({"name": "fire"}));
}

#[test]
fn scalar_and_boolean_results_are_valid_payloads() {
    let temp = tempfile::tempdir().expect("tempdir");
    let scalar = write_stub(temp.path(), "scalar-cli", "#!/bin/sh\nprintf '42\\n'\n");
    let boolean = write_stub(temp.path(), "bool-cli", "#!/bin/sh\nprintf 'true\\n'\n");

    let client = Client::new().with_full_cli(scalar.to_str().unwrap());
    assert_eq!(client.get_thumbnail_frame("/media/shot.mov").expect("frame"), json!(42));

    let client = Client::new().with_full_cli(boolean.to_str().unwrap());
    assert_eq!(client.get_thumbnail_frame("/media/shot.mov").expect("flag"), json!(true));
}

// There is deliberately no timeout: the call blocks for the lifetime of the
// child. A hung external process hangs the calling thread, a preserved
// limitation of the execution model, not a bug.
#[test]
fn invocation_blocks_until_the_child_exits() {
    let temp = tempfile::tempdir().expect("tempdir");
    let stub = write_stub(
        temp.path(),
        "das-element-cli",
        "#!/bin/sh\nsleep 0.3\nprintf '{}\\n'\n",
    );

    let client = Client::new().with_standard_cli(stub.to_str().unwrap());
    let started = Instant::now();
    let value = client.get_libraries().expect("decoded value");
    assert!(started.elapsed() >= Duration::from_millis(250));
    assert_eq!(value, json!({}));
}

#[test]
fn variants_run_independent_executables() {
    let temp = tempfile::tempdir().expect("tempdir");
    let standard = write_stub(
        temp.path(),
        "das-element-cli",
        "#!/bin/sh\nprintf '\"standard\"\\n'\n",
    );
    let full = write_stub(
        temp.path(),
        "das-element-cli-full",
        "#!/bin/sh\nprintf '\"full\"\\n'\n",
    );

    let client = Client::new()
        .with_standard_cli(standard.to_str().unwrap())
        .with_full_cli(full.to_str().unwrap());
    assert_eq!(client.get_libraries().expect("standard"), json!("standard"));
    assert_eq!(
        client.get_thumbnail_frame("/media/a.mov").expect("full"),
        json!("full")
    );
}
