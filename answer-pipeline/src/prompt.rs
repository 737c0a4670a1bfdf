//! Prompt builder: persona instruction, ranked context and the question.

use rag_base::RetrievedFragment;

use crate::persona::Persona;

/// Assembles the single prompt sent to the completion model:
///
/// ```text
/// System: <instruction>
///
/// Context:
/// <fragment 1>
///
/// <fragment 2>
///
/// <question label> <question>
/// <answer label>
/// ```
///
/// Fragments keep rank order. With no hits the context block is empty.
pub fn build_prompt(persona: &Persona, hits: &[RetrievedFragment<'_>], question: &str) -> String {
    let context = hits
        .iter()
        .map(|h| h.fragment.body.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "System: {}\n\nContext:\n{}\n\n{} {}\n{}",
        persona.system_instruction,
        context,
        persona.question_label,
        question,
        persona.answer_label
    )
}

#[cfg(test)]
mod tests {
    use rag_base::{Fragment, Heading};

    use super::*;

    fn persona() -> Persona {
        Persona {
            system_instruction: "Be brief.".into(),
            ..Persona::recruiter_twin()
        }
    }

    #[test]
    fn layout_matches_template() {
        let a = Fragment {
            index: 3,
            headings: vec![Heading::new(1, "Опыт")],
            body: "Опыт\nPM".into(),
        };
        let b = Fragment {
            index: 0,
            headings: vec![],
            body: "Intro".into(),
        };
        let hits = [
            RetrievedFragment {
                fragment: &a,
                score: 0.9,
            },
            RetrievedFragment {
                fragment: &b,
                score: 0.2,
            },
        ];

        let prompt = build_prompt(&persona(), &hits, "Где вы работали?");
        assert_eq!(
            prompt,
            "System: Be brief.\n\nContext:\nОпыт\nPM\n\nIntro\n\nВопрос: Где вы работали?\nОтвет:"
        );
    }

    #[test]
    fn no_hits_leaves_empty_context() {
        let prompt = build_prompt(&persona(), &[], "Hi");
        assert_eq!(prompt, "System: Be brief.\n\nContext:\n\n\nВопрос: Hi\nОтвет:");
    }
}
