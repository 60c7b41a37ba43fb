#![cfg(test)]

use std::{
    io::{Read, Write},
    process::{Command, Stdio},
    time::{Duration, Instant},
};

use chat_hvac::interaction::handlers;

#[test]
fn console_bot_exits_after_shutdown_command() {
    let workdir = tempfile::tempdir().unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_chat-hvac"))
        .args(["--adapter", "console"])
        .current_dir(workdir.path())
        .env("CHAT_HVAC_HEALTH_LISTEN", "127.0.0.1:0")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    // Keep stdin open: only the command may stop the bot.
    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(b"@hvac shutdown\n").unwrap();
    stdin.flush().unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }

        if Instant::now() > deadline {
            child.kill().unwrap();
            panic!("bot still running after the shutdown command");
        }

        std::thread::sleep(Duration::from_millis(50));
    };

    let mut stdout = String::new();
    child.stdout.take().unwrap().read_to_string(&mut stdout).unwrap();

    assert!(status.success());
    assert!(stdout.contains(&format!(">> (stdin) {}", handlers::SHUTDOWN_REPLY)));

    drop(stdin);
}
