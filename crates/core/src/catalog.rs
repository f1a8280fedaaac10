//! Static tool catalog used when no provider produces a usable answer.

use crate::domain::tool::ToolRecord;

#[derive(Debug, Clone, Copy)]
struct ToolSeed {
    name: &'static str,
    link: &'static str,
    description: &'static str,
}

#[derive(Debug, Clone, Copy)]
struct CategorySeed {
    name: &'static str,
    tools: &'static [ToolSeed],
}

const fn tool(name: &'static str, link: &'static str, description: &'static str) -> ToolSeed {
    ToolSeed { name, link, description }
}

const CATEGORY_SEEDS: &[CategorySeed] = &[
    CategorySeed {
        name: "pdf_converter",
        tools: &[
            tool("SmallPDF", "https://smallpdf.com", "Online PDF converter and editor"),
            tool("ILovePDF", "https://www.ilovepdf.com", "Free online PDF tools"),
            tool("PDF24", "https://tools.pdf24.org", "Free PDF tools and converter"),
            tool("Sejda PDF", "https://www.sejda.com", "Online PDF editor and converter"),
        ],
    },
    CategorySeed {
        name: "csv_tools",
        tools: &[
            tool(
                "CSV to PDF Converter",
                "https://www.convertcsv.com/csv-to-pdf.htm",
                "Convert CSV files to PDF format",
            ),
            tool(
                "Online CSV Tools",
                "https://onlinecsvtools.com",
                "Collection of CSV manipulation tools",
            ),
            tool("CSV Kit", "https://csvkit.readthedocs.io", "Command-line tools for CSV files"),
        ],
    },
    CategorySeed {
        name: "image_generator",
        tools: &[
            tool("DALL-E 2", "https://openai.com/dall-e-2", "AI image generator by OpenAI"),
            tool("Midjourney", "https://midjourney.com", "AI art generator"),
            tool("Stable Diffusion", "https://stability.ai", "Open-source AI image generator"),
            tool("Leonardo AI", "https://leonardo.ai", "AI-powered creative platform"),
        ],
    },
    CategorySeed {
        name: "text_generator",
        tools: &[
            tool("ChatGPT", "https://chat.openai.com", "Conversational AI by OpenAI"),
            tool("Claude", "https://claude.ai", "AI assistant by Anthropic"),
            tool("Gemini", "https://gemini.google.com", "Google's AI chatbot"),
            tool("Copy.ai", "https://copy.ai", "AI copywriting tool"),
        ],
    },
    CategorySeed {
        name: "code_assistant",
        tools: &[
            tool("GitHub Copilot", "https://github.com/features/copilot", "AI pair programmer"),
            tool("Tabnine", "https://www.tabnine.com", "AI code completion"),
            tool(
                "CodeWhisperer",
                "https://aws.amazon.com/codewhisperer",
                "Amazon's AI coding companion",
            ),
            tool("Cursor", "https://cursor.sh", "AI-first code editor"),
        ],
    },
    CategorySeed {
        name: "video_editor",
        tools: &[
            tool("Runway ML", "https://runwayml.com", "AI video editing and generation"),
            tool("Synthesia", "https://www.synthesia.io", "AI video generator with avatars"),
            tool("Lumen5", "https://lumen5.com", "AI-powered video creation"),
            tool("InVideo", "https://invideo.io", "AI video maker"),
        ],
    },
    CategorySeed {
        name: "design_tools",
        tools: &[
            tool("Canva", "https://www.canva.com", "AI-enhanced design platform"),
            tool(
                "Adobe Firefly",
                "https://www.adobe.com/products/firefly.html",
                "Adobe's generative AI",
            ),
            tool("Figma", "https://www.figma.com", "Collaborative design tool with AI features"),
            tool("Uizard", "https://uizard.io", "AI-powered design tool"),
        ],
    },
    CategorySeed {
        name: "music_generator",
        tools: &[
            tool("AIVA", "https://www.aiva.ai", "AI music composer"),
            tool("Mubert", "https://mubert.com", "AI music generator"),
            tool("Soundful", "https://soundful.com", "AI music creation platform"),
            tool("Boomy", "https://boomy.com", "Create songs with AI"),
        ],
    },
];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub tools: Vec<ToolRecord>,
}

/// Ordered, read-only mapping from category name to tools.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn builtin() -> Self {
        let categories = CATEGORY_SEEDS
            .iter()
            .map(|seed| Category {
                name: seed.name.to_string(),
                tools: seed
                    .tools
                    .iter()
                    .map(|tool| ToolRecord::new(tool.name, tool.link, tool.description))
                    .collect(),
            })
            .collect();
        Self { categories }
    }

    pub fn lookup(&self, category: &str) -> &[ToolRecord] {
        self.categories
            .iter()
            .find(|candidate| candidate.name == category)
            .map(|candidate| candidate.tools.as_slice())
            .unwrap_or(&[])
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
