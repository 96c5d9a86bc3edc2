use crate::models::{Difficulty, Flashcard};

pub struct CardSeed {
    pub id: &'static str,
    pub question: &'static str,
    pub answer: &'static str,
    pub difficulty: Difficulty,
    pub tags: &'static [&'static str],
}

pub const DECK_DATA: &[CardSeed] = &[
    CardSeed { id: "http-status-200", question: "What does HTTP status 200 mean?", answer: "OK — the request succeeded.", difficulty: Difficulty::Beginner, tags: &["http", "web"] },
    CardSeed { id: "http-status-301", question: "What does HTTP status 301 mean?", answer: "Moved Permanently — the resource has a new canonical URL.", difficulty: Difficulty::Beginner, tags: &["http", "web"] },
    CardSeed { id: "http-status-404", question: "What does HTTP status 404 mean?", answer: "Not Found — the server has no resource at that URL.", difficulty: Difficulty::Beginner, tags: &["http", "web"] },
    CardSeed { id: "http-status-503", question: "What does HTTP status 503 mean?", answer: "Service Unavailable — the server is temporarily unable to respond.", difficulty: Difficulty::Beginner, tags: &["http", "web"] },
    CardSeed { id: "http-idempotent", question: "Which HTTP methods are idempotent?", answer: "GET, HEAD, PUT, DELETE, OPTIONS and TRACE.", difficulty: Difficulty::Intermediate, tags: &["http", "web"] },
    CardSeed { id: "dns-record-a", question: "What does a DNS A record map?", answer: "A hostname to an IPv4 address.", difficulty: Difficulty::Beginner, tags: &["dns", "networking"] },
    CardSeed { id: "dns-record-cname", question: "What does a DNS CNAME record do?", answer: "Aliases one hostname to another hostname.", difficulty: Difficulty::Beginner, tags: &["dns", "networking"] },
    CardSeed { id: "tcp-handshake", question: "What are the three steps of the TCP handshake?", answer: "SYN, SYN-ACK, ACK.", difficulty: Difficulty::Intermediate, tags: &["tcp", "networking"] },
    CardSeed { id: "tls-sni", question: "What problem does TLS SNI solve?", answer: "Lets one IP serve many certificates by naming the host during the handshake.", difficulty: Difficulty::Advanced, tags: &["tls", "networking"] },
    CardSeed { id: "sql-left-join", question: "What rows does a LEFT JOIN return?", answer: "All rows from the left table, with NULLs where the right table has no match.", difficulty: Difficulty::Intermediate, tags: &["sql", "databases"] },
    CardSeed { id: "sql-index", question: "Why can an index slow down writes?", answer: "Every insert or update must also maintain the index structure.", difficulty: Difficulty::Intermediate, tags: &["sql", "databases"] },
    CardSeed { id: "acid-atomicity", question: "What does atomicity guarantee in ACID?", answer: "A transaction applies entirely or not at all.", difficulty: Difficulty::Intermediate, tags: &["databases"] },
    CardSeed { id: "acid-isolation", question: "What does isolation guarantee in ACID?", answer: "Concurrent transactions behave as if they ran one at a time.", difficulty: Difficulty::Advanced, tags: &["databases"] },
    CardSeed { id: "big-o-binary-search", question: "What is the time complexity of binary search?", answer: "O(log n).", difficulty: Difficulty::Beginner, tags: &["algorithms"] },
    CardSeed { id: "big-o-quicksort", question: "What is quicksort's average and worst-case complexity?", answer: "O(n log n) average, O(n^2) worst case.", difficulty: Difficulty::Intermediate, tags: &["algorithms"] },
    CardSeed { id: "hash-collision", question: "What is a hash collision?", answer: "Two distinct keys hashing to the same bucket.", difficulty: Difficulty::Beginner, tags: &["algorithms", "data-structures"] },
    CardSeed { id: "git-rebase", question: "What does git rebase do?", answer: "Replays commits on top of another base, rewriting history.", difficulty: Difficulty::Intermediate, tags: &["git", "tooling"] },
    CardSeed { id: "git-detached-head", question: "What is a detached HEAD in git?", answer: "HEAD points at a commit instead of a branch; new commits belong to no branch.", difficulty: Difficulty::Intermediate, tags: &["git", "tooling"] },
    CardSeed { id: "unix-pipe", question: "What does the shell pipe operator | do?", answer: "Connects one process's stdout to the next process's stdin.", difficulty: Difficulty::Beginner, tags: &["unix", "tooling"] },
    CardSeed { id: "unix-sigkill", question: "Why can a process not handle SIGKILL?", answer: "The kernel terminates it directly; the signal is never delivered to the process.", difficulty: Difficulty::Advanced, tags: &["unix"] },
    CardSeed { id: "cap-theorem", question: "What does the CAP theorem say?", answer: "Under a network partition a distributed system must trade consistency against availability.", difficulty: Difficulty::Advanced, tags: &["distributed-systems"] },
    CardSeed { id: "idempotent-consumer", question: "Why must message consumers usually be idempotent?", answer: "At-least-once delivery means the same message can arrive more than once.", difficulty: Difficulty::Advanced, tags: &["distributed-systems"] },
];

pub fn builtin_deck() -> Vec<Flashcard> {
    DECK_DATA
        .iter()
        .map(|seed| Flashcard {
            id: seed.id.to_string(),
            question: seed.question.to_string(),
            answer: seed.answer.to_string(),
            difficulty: seed.difficulty,
            tags: seed.tags.iter().map(|t| t.to_string()).collect(),
        })
        .collect()
}
