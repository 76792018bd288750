//! Offline responder.
//!
//! Replies come from [`SIMULATION_RULES`], an ordered table evaluated
//! against the lowercased prompt. The first rule whose matcher accepts the
//! prompt produces the reply; the last rule always matches.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use crate::core::message::Message;
use crate::core::providers::{
    effective_prompt, ProviderKind, Resolution, ResolveError, ResponseProvider,
};

pub const DEFAULT_SIMULATED_DELAY: Duration = Duration::from_millis(800);

pub const GREETING_RESPONSE: &str = "Hello! I'm your AI assistant. How can I help you today?";

pub const AI_EXPLAINER_RESPONSE: &str = "Artificial Intelligence (AI) refers to systems or machines that mimic human intelligence to perform tasks and can iteratively improve themselves based on the information they collect.\n\nKey areas of AI include:\n\n- **Machine Learning**: Algorithms that can learn from and make predictions based on data\n- **Deep Learning**: A subset of ML using neural networks with many layers\n- **Natural Language Processing**: Enabling computers to understand and generate human language\n- **Computer Vision**: Systems that can interpret and analyze visual information from the world\n- **Reinforcement Learning**: Learning through interaction with an environment to maximize rewards\n\nAI continues to transform fields like healthcare, finance, transportation, and entertainment.";

const WELLBEING_RESPONSE: &str = "I'm functioning well, thank you for asking! As an AI assistant, I'm here to help you with information, coding assistance, or answering questions. What can I help you with today?";

const SUM_RESPONSE: &str = "Here's code to sum two numbers in various languages:\n\n**JavaScript:**\n```javascript\nfunction sum(a, b) {\n  return a + b;\n}\n\nconst result = sum(5, 3);\nconsole.log(result); // 8\n```\n\n**Python:**\n```python\ndef sum(a, b):\n    return a + b\n\nresult = sum(5, 3)\nprint(result)  # 8\n```\n\n**Java:**\n```java\npublic int sum(int a, int b) {\n    return a + b;\n}\n\n// Usage\nint result = sum(5, 3);\nSystem.out.println(result); // 8\n```";

const JAVASCRIPT_RESPONSE: &str = "Here's an example JavaScript function:\n\n```javascript\n// Efficient fibonacci calculation using memoization\nfunction fibonacci(n, memo = {}) {\n  if (n in memo) return memo[n];\n  if (n <= 1) return n;\n  \n  memo[n] = fibonacci(n - 1, memo) + fibonacci(n - 2, memo);\n  return memo[n];\n}\n\n// Example usage\nconst result = fibonacci(10);\nconsole.log(result); // 55\n```\n\nThis implementation uses memoization to avoid redundant calculations, making it much more efficient than a naive recursive approach.";

const REACT_RESPONSE: &str = "React is a popular JavaScript library for building user interfaces, particularly single-page applications. Here's a modern React component example using hooks:\n\n```jsx\nimport React, { useState, useEffect } from 'react';\n\nfunction Counter() {\n  // State hook to manage counter value\n  const [count, setCount] = useState(0);\n  const [isEven, setIsEven] = useState(true);\n  \n  // Effect hook to check if count is even\n  useEffect(() => {\n    setIsEven(count % 2 === 0);\n  }, [count]);\n  \n  return (\n    <div className=\"counter\">\n      <h2>Counter: {count}</h2>\n      <p>The count is {isEven ? 'even' : 'odd'}</p>\n      <button onClick={() => setCount(count + 1)}>\n        Increment\n      </button>\n      <button onClick={() => setCount(count - 1)}>\n        Decrement\n      </button>\n    </div>\n  );\n}\n\nexport default Counter;\n```\n\nThis component uses the `useState` hook to manage state and the `useEffect` hook to perform side effects when the state changes.";

const CSS_RESPONSE: &str = "Tailwind CSS is a utility-first CSS framework that allows you to build custom designs without writing traditional CSS. Here's an example button implementation using Tailwind:\n\n```html\n<button class=\"px-4 py-2 font-bold text-white bg-blue-500 rounded hover:bg-blue-700 focus:outline-none focus:shadow-outline transform transition hover:-translate-y-1 hover:scale-110\">\n  Click me\n</button>\n```\n\nThis creates a blue button with padding, rounded corners, and hover effects including a subtle animation. Tailwind's approach allows for rapid UI development without leaving your HTML or building separate CSS files.";

const PYTHON_RESPONSE: &str = "Python is a high-level, interpreted programming language known for its readability and versatility. Here's a Python example showing a decorators, which are a powerful feature:\n\n```python\ndef timer_decorator(func):\n    \"\"\"\n    A decorator that measures and prints execution time of functions\n    \"\"\"\n    import time\n    def wrapper(*args, **kwargs):\n        start_time = time.time()\n        result = func(*args, **kwargs)\n        end_time = time.time()\n        print(f\"{func.__name__} executed in {end_time - start_time:.4f} seconds\")\n        return result\n    return wrapper\n\n@timer_decorator\ndef calculate_fibonacci(n):\n    if n <= 0:\n        return 0\n    elif n == 1:\n        return 1\n    else:\n        return calculate_fibonacci(n-1) + calculate_fibonacci(n-2)\n\nresult = calculate_fibonacci(20)\nprint(f\"Result: {result}\")\n```\n\nThis example demonstrates a decorator that measures the execution time of any function it wraps.";

const ATTACHMENT_HELP_RESPONSE: &str = "I see you're interested in the file upload features of this chatbot. Files, images, and voice recordings can all be attached to a message.\n\n**How to use attachments:**\n1. `/attach file NAME` attaches a document (PDF, TXT, DOC, etc.)\n2. `/attach image NAME` attaches an image (JPG, PNG, GIF)\n3. `/attach audio SECONDS` attaches a voice recording\n\nOnce you attach something, I can respond to it accordingly. Try it out!";

const CAPABILITIES_RESPONSE: &str = "I can help with a variety of tasks:\n\n1. **Answer questions** about programming, technology, science, etc.\n2. **Generate code** in different programming languages\n3. **Explain concepts** in a clear, understandable way\n4. **Assist with debugging** code issues\n5. **Provide examples** of implementation patterns\n6. **Process attached files** and images (use `/attach`)\n7. **Take voice input** (use `/attach audio`)\n\nFeel free to ask anything specific you'd like help with!";

const GENERIC_ATTACHMENT_RESPONSE: &str = "I can see you've shared an attachment. In a production system, I would process this file and respond based on its contents. For now, feel free to describe what you'd like me to help you with regarding this attachment.";

static FILE_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[User has attached a file: (.*?)\]").expect("file description pattern is valid")
});
static IMAGE_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[User has attached an image: (.*?)\]")
        .expect("image description pattern is valid")
});
static AUDIO_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[User has attached an audio recording: (.*?)\]")
        .expect("audio description pattern is valid")
});

/// One row of the simulator's rule table.
pub struct SimulationRule {
    pub name: &'static str,
    /// Receives the lowercased prompt.
    matches: fn(&str) -> bool,
    /// Receives the prompt as typed and its lowercased form.
    respond: fn(&str, &str) -> String,
}

impl SimulationRule {
    pub fn matches(&self, lowered: &str) -> bool {
        (self.matches)(lowered)
    }

    pub fn respond(&self, prompt: &str, lowered: &str) -> String {
        (self.respond)(prompt, lowered)
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

fn canned(text: &'static str) -> String {
    text.to_string()
}

fn captured(pattern: &Regex, prompt: &str) -> Option<String> {
    pattern
        .captures(prompt)
        .and_then(|caps| caps.get(1))
        .map(|value| value.as_str().to_string())
}

fn respond_to_attachment(prompt: &str, lowered: &str) -> String {
    if lowered.contains("attached a file") {
        let name = captured(&FILE_DESCRIPTION, prompt).unwrap_or_else(|| "document".to_string());
        format!("I've received your file: {name}. I can analyze the content of this file once it's properly uploaded. For now, this is a simulated response since actual file processing requires server-side implementation. In a production system, I would be able to extract text, analyze data, or process the information contained in your file.")
    } else if lowered.contains("attached an image") {
        let name = captured(&IMAGE_DESCRIPTION, prompt).unwrap_or_else(|| "image".to_string());
        format!("I can see you've shared an image: {name}. In a production version of this chat, I would be able to analyze the image content, detect objects, read text, or describe what's in the picture. This is currently a simulated response, but image processing capabilities would be fully functional in a complete implementation.")
    } else if lowered.contains("attached an audio") {
        let duration = captured(&AUDIO_DESCRIPTION, prompt)
            .unwrap_or_else(|| "unknown duration".to_string());
        format!("I've received your audio recording ({duration}). In a fully implemented system, I would transcribe this audio to text and respond based on what you said. Voice processing is a powerful feature that would be available in the production version of this chatbot.")
    } else {
        canned(GENERIC_ATTACHMENT_RESPONSE)
    }
}

fn respond_with_code_sample(_prompt: &str, lowered: &str) -> String {
    format!("Here's some sample code based on your query \"{lowered}\":\n\n```javascript\n// A simple function to demonstrate what you're asking about\nfunction processRequest(input) {{\n  // Parse the input\n  const data = JSON.parse(input);\n  \n  // Process the data\n  const result = data.map(item => {{\n    return {{\n      id: item.id,\n      value: item.value * 2,\n      processed: true\n    }};\n  }});\n  \n  return result;\n}}\n```\n\nIs this the kind of code you were looking for? I can provide examples in other languages too.")
}

fn respond_generically(_prompt: &str, lowered: &str) -> String {
    format!("I understand you're asking about \"{lowered}\". Here's what I can tell you:\n\nThis topic involves several key concepts that are important to understand. The primary factors to consider are:\n\n1. **Context matters**: The specific details of your situation will influence the approach\n2. **Best practices**: There are established methods that can be applied\n3. **Trade-offs**: Every solution has advantages and disadvantages\n\nCould you provide more specific details about what you're trying to accomplish with \"{lowered}\" so I can give you more targeted assistance?")
}

/// Evaluated top to bottom; keyword checks are plain substring matches, so
/// `hi` also fires on words like `this`.
pub static SIMULATION_RULES: &[SimulationRule] = &[
    SimulationRule {
        name: "attachment",
        matches: |p| p.contains("[user has attached"),
        respond: respond_to_attachment,
    },
    SimulationRule {
        name: "sum",
        matches: |p| p.contains("sum") && p.contains("number"),
        respond: |_, _| canned(SUM_RESPONSE),
    },
    SimulationRule {
        name: "greeting",
        matches: |p| contains_any(p, &["hello", "hi"]),
        respond: |_, _| canned(GREETING_RESPONSE),
    },
    SimulationRule {
        name: "wellbeing",
        matches: |p| p.contains("how are you"),
        respond: |_, _| canned(WELLBEING_RESPONSE),
    },
    SimulationRule {
        name: "javascript",
        matches: |p| contains_any(p, &["javascript", "function"]) && !p.contains("sum"),
        respond: |_, _| canned(JAVASCRIPT_RESPONSE),
    },
    SimulationRule {
        name: "react",
        matches: |p| p.contains("react"),
        respond: |_, _| canned(REACT_RESPONSE),
    },
    SimulationRule {
        name: "ai",
        matches: |p| contains_any(p, &["ai", "artificial intelligence"]),
        respond: |_, _| canned(AI_EXPLAINER_RESPONSE),
    },
    SimulationRule {
        name: "css",
        matches: |p| contains_any(p, &["tailwind", "css"]),
        respond: |_, _| canned(CSS_RESPONSE),
    },
    SimulationRule {
        name: "python",
        matches: |p| p.contains("python"),
        respond: |_, _| canned(PYTHON_RESPONSE),
    },
    SimulationRule {
        name: "attachment-help",
        matches: |p| contains_any(p, &["image", "upload", "attach", "file"]),
        respond: |_, _| canned(ATTACHMENT_HELP_RESPONSE),
    },
    SimulationRule {
        name: "capabilities",
        matches: |p| contains_any(p, &["help", "what can you do"]),
        respond: |_, _| canned(CAPABILITIES_RESPONSE),
    },
    SimulationRule {
        name: "code",
        matches: |p| contains_any(p, &["code", "program"]),
        respond: respond_with_code_sample,
    },
    SimulationRule {
        name: "generic",
        matches: |_| true,
        respond: respond_generically,
    },
];

/// The first rule accepting `prompt`.
pub fn matching_rule(prompt: &str) -> &'static SimulationRule {
    let lowered = prompt.to_lowercase();
    SIMULATION_RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .unwrap_or(&SIMULATION_RULES[SIMULATION_RULES.len() - 1])
}

pub fn simulated_reply(prompt: &str) -> String {
    let lowered = prompt.to_lowercase();
    let rule = matching_rule(prompt);
    debug!(rule = rule.name, "simulated response");
    rule.respond(prompt, &lowered)
}

#[derive(Debug, Clone)]
pub struct SimulatedProvider {
    delay: Duration,
    kind: ProviderKind,
}

impl SimulatedProvider {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            kind: ProviderKind::Simulate,
        }
    }

    /// Report `kind` from [`ResponseProvider::kind`]; used when a remote
    /// provider is selected but has no credentials.
    pub fn reporting_as(mut self, kind: ProviderKind) -> Self {
        self.kind = kind;
        self
    }
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATED_DELAY)
    }
}

#[async_trait]
impl ResponseProvider for SimulatedProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn resolve(
        &self,
        history: &[Message],
        prompt_override: Option<&str>,
    ) -> Result<Resolution, ResolveError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let prompt = effective_prompt(history, prompt_override);
        Ok(Resolution::new(simulated_reply(prompt)))
    }
}
