//! Concurrent judgement against one shared chain slot.
//!
//! Two independent `FileChainStore` handles open the same path, so the
//! in-process mutex of each handle does not order the other's callers;
//! only the file lock does.

use std::collections::HashMap;

use anyhow::Result;
use shiritori::core::Kana;
use shiritori::{EventId, Verdict};
use shiritori_testkit::TestFixture;

const POSTS: usize = 32;

fn k(c: char) -> Kana {
    Kana::new(c).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_posts_leave_one_complete_write() -> Result<()> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let fixture = TestFixture::new();
    let a = fixture.file_judge();
    let b = fixture.file_judge();
    assert!(a.judge("あさ", "seed").await?.is_accepted());

    // Every post starts with サ; some end in サ and keep the chain open for
    // the others, some end in ア and close it.
    let texts = ["さかさ", "さくさ", "さあ", "さらさ"];
    let mut tasks = Vec::new();
    for i in 0..POSTS {
        let judge = if i % 2 == 0 { a.clone() } else { b.clone() };
        let text = texts[i % texts.len()];
        let event_id = format!("ev{i:02}");
        tasks.push(tokio::spawn(async move {
            let verdict = judge.judge(text, event_id.as_str()).await;
            (event_id, verdict)
        }));
    }

    let mut accepted: HashMap<String, Kana> = HashMap::new();
    for task in tasks {
        let (event_id, verdict) = task.await?;
        match verdict? {
            Verdict::Accepted { head, last } => {
                assert_eq!(head, k('サ'));
                accepted.insert(event_id, last);
            }
            Verdict::RejectedNotConnected { prev_last, .. } => {
                assert_eq!(prev_last, k('ア'));
            }
            other => panic!("unexpected verdict {other:?}"),
        }
    }
    assert!(!accepted.is_empty());

    // The slot holds exactly one accepted post, intact.
    let raw = std::fs::read_to_string(fixture.slot_path())?;
    let (kana, event_id) = raw.split_once('\n').unwrap();
    let expected_last = accepted
        .get(event_id)
        .unwrap_or_else(|| panic!("slot names a post that was never accepted: {raw:?}"));
    assert_eq!(kana.chars().collect::<Vec<_>>(), vec![expected_last.as_char()]);

    let state = a.chain_state().await?.unwrap();
    assert_eq!(state.last_event_id, EventId::from(event_id));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_redelivery_accepts_once() -> Result<()> {
    let fixture = TestFixture::new();
    let a = fixture.file_judge();
    let b = fixture.sqlite_judge();
    let c = fixture.file_judge();

    let mut tasks = Vec::new();
    for judge in [a.clone(), c.clone(), a.clone(), c.clone()] {
        tasks.push(tokio::spawn(async move { judge.judge("めだか", "same").await }));
    }
    let mut accepted = 0;
    for task in tasks {
        match task.await?? {
            Verdict::Accepted { .. } => accepted += 1,
            Verdict::RejectedDuplicate => {}
            other => panic!("unexpected verdict {other:?}"),
        }
    }
    assert_eq!(accepted, 1);

    // the SQLite slot is a separate chain
    assert_eq!(b.chain_state().await?, None);
    Ok(())
}
