//! Fixed text shown by [`AsyncProcessingExplanation`](super::AsyncProcessingExplanation).

pub const TITLE: &str = "Asynchronous Processing";

/// Displayed and searched, never executed
pub const CODE_SOURCE: &str = r#"
import asyncio
import nest_asyncio
import pandas as pd
from signalfloweeg.io import get_amplitude_statistics

async def process_file(filename):
    print(f"Processing file: {filename}")
    result = get_amplitude_statistics(filename, 'EEGLAB_RAW_SET')
    return result

async def process_files(df):
    tasks = []
    for _, row in df.iterrows():
        filename = row['FullFile']
        task = asyncio.create_task(process_file(filename))
        tasks.append(task)
    results = await asyncio.gather(*tasks)
    result_df = pd.DataFrame(results)
    return result_df

filelist = pd.read_csv(path.join(analysispath, 'data/01_sprest_filelist.csv'))
df = filelist

nest_asyncio.apply()

presource_df = await process_files(df)
print("Final Result DataFrame:")
print(presource_df)

presource_df.to_csv(path.join(analysispath, 'data/02_sprest_filelist_amplitudes.csv'), index=False)
"#;

pub const NARRATION: [&str; 8] = [
    "The code demonstrates asynchronous processing using the asyncio library in Python.",
    "The process_file function processes a single file asynchronously.",
    "The process_files function creates tasks for each file and processes them concurrently.",
    "The nest_asyncio library is used to allow asyncio usage in Jupyter Notebook.",
    "The filelist is loaded from a CSV file using pandas.",
    "The process_files function is called with the filelist DataFrame.",
    "The results are stored in a new DataFrame called presource_df.",
    "Finally, the presource_df is saved to a new CSV file.",
];

/// Code line to flash, and the caption written while it flashes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightEvent {
    pub line: &'static str,
    pub description: &'static str,
}

pub const HIGHLIGHTS: [HighlightEvent; 4] = [
    HighlightEvent {
        line: "async def process_file(filename):",
        description: "process_file function",
    },
    HighlightEvent {
        line: "async def process_files(df):",
        description: "process_files function",
    },
    HighlightEvent {
        line: "nest_asyncio.apply()",
        description: "nest_asyncio usage",
    },
    HighlightEvent {
        line: "presource_df = await process_files(df)",
        description: "Calling process_files",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_highlight_target_is_in_the_code() {
        assert!(HIGHLIGHTS.iter().all(|h| CODE_SOURCE.contains(h.line)));
    }

    #[test]
    fn test_narration_is_non_empty() {
        assert!(NARRATION.iter().all(|n| !n.trim().is_empty()));
    }
}
