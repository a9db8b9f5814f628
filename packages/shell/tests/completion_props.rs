use cloudsh::commands::default_table;
use cloudsh::completer::complete;
use cloudsh::remote::MemoryTree;
use cloudsh::session::Session;
use cloudsh::tokenizer::tokenize;
use proptest::prelude::*;

proptest! {
    #[test]
    fn command_prefix_lists_matching_names(prefix in "[a-z]{1,4}") {
        let table = default_table();
        let completion = complete(&prefix, prefix.len(), &table, &Session::new(), &MemoryTree::new());

        let expected: Vec<String> = table
            .names()
            .filter(|name| name.starts_with(prefix.as_str()))
            .map(|name| format!("{} ", name))
            .collect();

        prop_assert_eq!(completion.start, 0);
        prop_assert_eq!(completion.candidates, expected);
    }

    #[test]
    fn applied_file_candidates_tokenize_to_the_name(
        name in "[a-zA-Z0-9 '\"\\\\_-][a-zA-Z0-9 '\"\\\\_.-]{0,7}",
    ) {
        let tree = MemoryTree::new().with_file(&format!("/{}", name));
        let line = "ls ";
        let completion = complete(line, line.len(), &default_table(), &Session::new(), &tree);

        prop_assert_eq!(completion.candidates.len(), 1);
        let applied = completion.apply(line, line.len(), &completion.candidates[0]);
        prop_assert_eq!(tokenize(&applied), vec!["ls".to_string(), name]);
    }

    #[test]
    fn unknown_commands_never_complete_paths(word in "[A-Z]{1,6}") {
        let line = format!("{} ", word);
        let tree = MemoryTree::new().with_file("/a");
        let completion = complete(&line, line.len(), &default_table(), &Session::new(), &tree);
        prop_assert!(completion.candidates.is_empty());
    }
}
