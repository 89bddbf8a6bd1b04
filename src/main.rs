use clap::{Arg, ArgMatches, Command};
use n1_quiz::sources::{HttpFetcher, MockMode, MockSource, VocabSource, default_sources, sample_records};
use n1_quiz::{
    Aggregator, Category, Question, QuizConfig, QuizError, QuizSession, load_all, load_deck,
    load_status, make_rng, normalize, parse_limit, prepare_quiz, save_deck,
};
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

type InputLines = Lines<BufReader<Stdin>>;

fn quiz_args() -> Vec<Arg> {
    vec![
        Arg::new("limit")
            .long("limit")
            .short('n')
            .help("Number of words to draw questions from (10-3000)"),
        Arg::new("category")
            .long("category")
            .short('c')
            .help("Part of speech to ask about: all, 名詞, 動詞, 形容詞, 副詞"),
        Arg::new("seed")
            .long("seed")
            .help("Seed for reproducible question sets")
            .value_parser(clap::value_parser!(u64)),
    ]
}

fn cli() -> Command {
    Command::new("n1-quiz")
        .version(env!("CARGO_PKG_VERSION"))
        .about("JLPT N1 vocabulary quiz built from public word lists")
        .subcommand_required(true)
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use the built-in sample vocabulary instead of fetching")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .help("Per-request fetch timeout in seconds")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log fetch progress to stderr")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("play")
                .about("Play the quiz in the terminal")
                .args(quiz_args())
                .arg(
                    Arg::new("time-limit")
                        .long("time-limit")
                        .short('t')
                        .help("Seconds per question")
                        .value_parser(clap::value_parser!(u64).range(1..)),
                )
                .arg(
                    Arg::new("deck")
                        .long("deck")
                        .short('d')
                        .help("Play a saved question deck instead of fetching")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write a generated question deck as JSON")
                .args(quiz_args())
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .help("Output file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(Command::new("sources").about("Fetch every source and report word counts"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();

    let level = if matches.get_flag("verbose") { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    let mut config = QuizConfig::from_env()?;
    if let Some(secs) = matches.get_one::<u64>("timeout") {
        config.fetch_timeout = Duration::from_secs(*secs);
    }
    let use_mock = matches.get_flag("mock");

    let result = match matches.subcommand() {
        Some(("play", sub)) => run_play(sub, config, use_mock).await,
        Some(("export", sub)) => run_export(sub, config, use_mock).await,
        Some(("sources", _)) => run_sources(&config, use_mock).await,
        _ => unreachable!("subcommand_required is set"),
    };

    if let Err(e) = &result {
        if let Some(quiz_err) = e.downcast_ref::<QuizError>() {
            eprintln!("❌ {}", quiz_err.user_message());
        } else {
            eprintln!("❌ {}", e);
        }
    }
    result
}

fn apply_quiz_args(sub: &ArgMatches, config: &mut QuizConfig) {
    if let Some(limit) = sub.get_one::<String>("limit") {
        config.limit = parse_limit(limit);
    }
    if let Some(category) = sub.get_one::<String>("category") {
        config.category = category.parse().unwrap_or(Category::All);
    }
    if let Some(seed) = sub.get_one::<u64>("seed") {
        config.seed = Some(*seed);
    }
}

fn build_sources(config: &QuizConfig, use_mock: bool) -> Result<Vec<Box<dyn VocabSource>>, Box<dyn std::error::Error>> {
    if use_mock {
        return Ok(vec![Box::new(MockSource::new(
            "sample",
            MockMode::Records(sample_records()),
        ))]);
    }
    let http = HttpFetcher::new(config.fetch_timeout)?;
    Ok(default_sources(&http))
}

async fn generate(config: &QuizConfig, use_mock: bool, rng: &mut StdRng) -> Result<Vec<Question>, Box<dyn std::error::Error>> {
    let sources = build_sources(config, use_mock)?;
    println!("データ取得中…（複数ソースから統合）");
    let vocab = load_all(&sources, &Aggregator::new(config.source_deadline)).await;
    println!("{}", load_status(&vocab));
    Ok(prepare_quiz(&vocab, config, rng)?)
}

async fn run_play(sub: &ArgMatches, mut config: QuizConfig, use_mock: bool) -> Result<(), Box<dyn std::error::Error>> {
    apply_quiz_args(sub, &mut config);
    if let Some(secs) = sub.get_one::<u64>("time-limit") {
        config.answer_time_limit = Duration::from_secs(*secs);
    }

    let mut rng = make_rng(config.seed);
    let questions = match sub.get_one::<PathBuf>("deck") {
        Some(path) => {
            let deck: Vec<Question> = load_deck(path)?
                .into_iter()
                .filter(|q| config.category.matches(&q.part_of_speech))
                .collect();
            if deck.is_empty() {
                return Err(QuizError::NoQuestionsForCategory(config.category.to_string()).into());
            }
            deck
        }
        None => generate(&config, use_mock, &mut rng).await?,
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut session = QuizSession::new(questions);

    loop {
        session.start(&mut rng)?;
        if !play_session(&mut session, config.answer_time_limit, &mut lines).await? {
            return Ok(());
        }

        let summary = session.summary();
        println!();
        println!(
            "終了！ スコア: {} / {} ({:.0}%)",
            summary.score,
            summary.total,
            summary.accuracy_percent()
        );

        let Some(review) = session.review() else {
            return Ok(());
        };
        println!("間違えた問題を復習しますか？ (y/n)");
        match lines.next_line().await? {
            Some(answer) if answer.trim().eq_ignore_ascii_case("y") => session = review,
            _ => return Ok(()),
        }
    }
}

/// Run one session to the end; `false` when input closed early
async fn play_session(
    session: &mut QuizSession,
    time_limit: Duration,
    lines: &mut InputLines,
) -> Result<bool, Box<dyn std::error::Error>> {
    while let Some(question) = session.current().cloned() {
        let (position, total) = session.progress();
        println!();
        println!("{} / {}    スコア: {}", position, total, session.score());
        println!("{}（品詞: {}）", question.prompt, question.part_of_speech);
        for (i, choice) in question.choices.iter().enumerate() {
            println!("  {}) {}", i + 1, choice);
        }
        println!("番号を入力（制限時間 {}秒）:", time_limit.as_secs());

        let correct = question.correct_choice().unwrap_or_default().to_string();
        let verdict = match read_choice(lines, question.choices.len(), time_limit).await? {
            Input::Choice(choice) => session.answer(choice)?,
            Input::TimedOut => {
                println!("時間切れ！");
                session.time_out()?
            }
            Input::Closed => return Ok(false),
        };

        if verdict.correct {
            println!("正解！");
        } else {
            println!("不正解… 正解: {}", correct);
        }
        if let Some(explanation) = &question.explanation {
            println!("{}", explanation);
        }
    }
    Ok(true)
}

enum Input {
    Choice(usize),
    TimedOut,
    Closed,
}

/// Read a 1-based choice number before the deadline, re-prompting on bad input
async fn read_choice(lines: &mut InputLines, choices: usize, time_limit: Duration) -> std::io::Result<Input> {
    let deadline = Instant::now() + time_limit;
    loop {
        let line = match tokio::time::timeout_at(deadline, lines.next_line()).await {
            Err(_) => return Ok(Input::TimedOut),
            Ok(line) => line?,
        };
        let Some(line) = line else {
            return Ok(Input::Closed);
        };
        match line.trim().parse::<usize>() {
            Ok(n) if (1..=choices).contains(&n) => return Ok(Input::Choice(n - 1)),
            _ => println!("1〜{} の番号を入力してください", choices),
        }
    }
}

async fn run_export(sub: &ArgMatches, mut config: QuizConfig, use_mock: bool) -> Result<(), Box<dyn std::error::Error>> {
    apply_quiz_args(sub, &mut config);
    let out = sub
        .get_one::<PathBuf>("out")
        .ok_or("missing --out")?;

    let mut rng = make_rng(config.seed);
    let questions = generate(&config, use_mock, &mut rng).await?;
    save_deck(out, &questions)?;
    println!("{}問を {} に書き出しました", questions.len(), out.display());
    Ok(())
}

async fn run_sources(config: &QuizConfig, use_mock: bool) -> Result<(), Box<dyn std::error::Error>> {
    let sources = build_sources(config, use_mock)?;
    let report = Aggregator::new(config.source_deadline)
        .run_all_with_report(&sources)
        .await;

    for count in &report.per_source {
        let note = if count.timed_out { " (timed out)" } else { "" };
        println!("{:<28} {:>6}{}", count.name, count.records, note);
    }
    let vocab = normalize(report.records, None);
    println!("{}", load_status(&vocab));
    Ok(())
}
