use std::{
    io::Write,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use answer_pipeline::{
    AnswerPipeline, AnswerResult, CompletionFuture, CompletionProvider, FailureReason,
    PipelineConfig, PipelineError, Persona,
};
use rag_base::{
    EmbeddingsProvider, HashingEmbedder, IndexConfig, KnowledgeBaseLoader, KnowledgeSource,
    RagBaseError, embedding::EmbedFuture, structs::rag_base_config::LoaderConfig,
};

const KB: &str = "Игорь Волнухин, руководитель проектов.
I. Опыт
Руководил внедрением ERP в банке, команда 25 человек.
II. Условия
*Зарплата*
Зарплата: 2 500 000 тенге в месяц.
*Формат работы*
Удалённо или офис в Астане.
III. Волонтёрство
Волонтёр PMI Kazakhstan Chapter.
";

/// Answers with the first context line mentioning the salary; records prompts.
#[derive(Default)]
struct ReadingCompleter {
    prompts: Mutex<Vec<String>>,
}

impl CompletionProvider for ReadingCompleter {
    fn complete<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let line = prompt
            .lines()
            .find(|l| l.starts_with("Зарплата:"))
            .map(|l| format!("Моя ожидаемая {}", l.to_lowercase()))
            .unwrap_or_else(|| "Уточню позже по почте.".to_string());
        Box::pin(async move { Ok(line) })
    }
}

struct SlowCompleter;

impl CompletionProvider for SlowCompleter {
    fn complete<'a>(&'a self, _prompt: &'a str) -> CompletionFuture<'a> {
        Box::pin(async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        })
    }
}

struct FailingCompleter {
    calls: AtomicUsize,
}

impl CompletionProvider for FailingCompleter {
    fn complete<'a>(&'a self, _prompt: &'a str) -> CompletionFuture<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async {
            Err(PipelineError::Completion(
                "upstream 500: internal-trace-id=42".to_string(),
            ))
        })
    }
}

/// Hashing embedder that refuses any text containing `FAIL`.
struct RefusingEmbedder(HashingEmbedder);

impl EmbeddingsProvider for RefusingEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a> {
        if text.contains("FAIL") {
            return Box::pin(async { Err(RagBaseError::Embedding("quota exceeded".into())) });
        }
        self.0.embed(text)
    }

    fn model_id(&self) -> &str {
        "refusing"
    }
}

fn kb_file() -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(KB.as_bytes()).unwrap();
    f
}

fn pipeline_cfg() -> PipelineConfig {
    PipelineConfig {
        top_k: 2,
        retrieval_timeout: Duration::from_secs(5),
        completion_timeout: Duration::from_millis(200),
    }
}

async fn pipeline_with(
    embedder: Arc<dyn EmbeddingsProvider>,
    completer: Arc<dyn CompletionProvider>,
) -> AnswerPipeline {
    let file = kb_file();
    let loader = KnowledgeBaseLoader::new(&LoaderConfig::default()).unwrap();
    let source = KnowledgeSource::LocalFile(file.path().to_path_buf());
    AnswerPipeline::from_source(
        Persona::recruiter_twin(),
        &source,
        &loader,
        embedder,
        completer,
        pipeline_cfg(),
        &IndexConfig::default(),
    )
    .await
    .unwrap()
}

fn hashing() -> Arc<dyn EmbeddingsProvider> {
    Arc::new(HashingEmbedder::new(1024).unwrap())
}

#[tokio::test]
async fn russian_salary_question_is_answered_from_context() {
    let completer = Arc::new(ReadingCompleter::default());
    let pipeline = pipeline_with(hashing(), completer.clone()).await;

    let result = pipeline.answer("Какая у тебя зарплата в тенге?").await;

    assert!(result.is_answered());
    assert!(result.text().contains("2 500 000"), "{result:?}");

    let prompts = completer.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    let prompt = &prompts[0];
    assert!(prompt.starts_with("System: Ты — цифровой двойник"));
    assert!(prompt.contains("на том языке, на котором задан вопрос"));
    assert!(prompt.contains("Зарплата: 2 500 000 тенге в месяц."));
    assert!(prompt.ends_with("Вопрос: Какая у тебя зарплата в тенге?\nОтвет:"));
}

#[tokio::test]
async fn completion_timeout_yields_fallback_without_details() {
    let pipeline = pipeline_with(hashing(), Arc::new(SlowCompleter)).await;

    let result = pipeline.answer("Какой формат работы?").await;

    assert_eq!(
        result,
        AnswerResult::Failed {
            reason: FailureReason::CompletionError,
            fallback: Persona::recruiter_twin().fallback_ru,
        }
    );
    assert!(!result.text().contains("timed out"));
}

#[tokio::test]
async fn completion_error_is_not_leaked_and_fallback_matches_language() {
    let completer = Arc::new(FailingCompleter {
        calls: AtomicUsize::new(0),
    });
    let pipeline = pipeline_with(hashing(), completer.clone()).await;

    let result = pipeline.answer("What is your salary?").await;

    match &result {
        AnswerResult::Failed { reason, fallback } => {
            assert_eq!(*reason, FailureReason::CompletionError);
            assert_eq!(fallback, &Persona::recruiter_twin().fallback_en);
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(!result.text().contains("internal-trace-id"));
    assert_eq!(completer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn retrieval_failure_skips_completion() {
    let completer = Arc::new(FailingCompleter {
        calls: AtomicUsize::new(0),
    });
    let embedder = Arc::new(RefusingEmbedder(HashingEmbedder::new(64).unwrap()));
    let pipeline = pipeline_with(embedder, completer.clone()).await;

    let result = pipeline.answer("FAIL please").await;

    assert!(matches!(
        result,
        AnswerResult::Failed {
            reason: FailureReason::RetrievalError,
            ..
        }
    ));
    assert_eq!(completer.calls.load(Ordering::SeqCst), 0);
    assert!(!result.text().contains("quota"));
}

#[tokio::test]
async fn unreadable_source_is_a_knowledge_base_error() {
    let loader = KnowledgeBaseLoader::new(&LoaderConfig::default()).unwrap();
    let source = KnowledgeSource::LocalFile("/no/such/kb.txt".into());

    let err = AnswerPipeline::from_source(
        Persona::pmi_chapter(),
        &source,
        &loader,
        hashing(),
        Arc::new(SlowCompleter),
        pipeline_cfg(),
        &IndexConfig::default(),
    )
    .await
    .err()
    .unwrap();

    assert!(matches!(
        err,
        PipelineError::KnowledgeBase(RagBaseError::Read { .. })
    ));
}

#[tokio::test]
async fn personas_keep_separate_indexes() {
    let a = pipeline_with(hashing(), Arc::new(ReadingCompleter::default())).await;

    let loader = KnowledgeBaseLoader::new(&LoaderConfig::default()).unwrap();
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all("I. Членство\nЧленство в отделении PMI.".as_bytes())
        .unwrap();
    let b = AnswerPipeline::from_source(
        Persona::pmi_chapter(),
        &KnowledgeSource::LocalFile(f.path().to_path_buf()),
        &loader,
        hashing(),
        Arc::new(ReadingCompleter::default()),
        pipeline_cfg(),
        &IndexConfig::default(),
    )
    .await
    .unwrap();

    assert_ne!(a.persona().key, b.persona().key);
    assert_eq!(b.index().len(), 1);
    assert!(a.index().len() > b.index().len());
}
